//! Configuration for apod.
//!
//! Configuration sources (highest priority first):
//! 1. `--home` flag / APOD_HOME, and APOD_API_KEY environment variables
//! 2. Config file (.apod/config.yaml)
//! 3. Defaults (~/.apod, DEMO_KEY)
//!
//! Config file discovery:
//! - Searches current directory and parents for .apod/config.yaml
//! - Paths in config file are relative to the config file's project root
//!
//! The resolved configuration is an explicit value handed to whoever
//! needs it; nothing is cached in process-wide state.

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub use paths::CacheLayout;

/// Default APOD endpoint
pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Key accepted by api.nasa.gov for low-volume use
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Environment variable overriding the API key
pub const API_KEY_ENV: &str = "APOD_API_KEY";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Cache home directory (relative to project root)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the cache home
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// APOD API settings
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub key: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_API_KEY.to_string(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ResolvedConfig {
    /// Image directory and index locations
    pub fn layout(&self) -> CacheLayout {
        CacheLayout::under(&self.home)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".apod").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Default cache home (~/.apod)
fn default_home() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".apod"))
}

/// Merge config file, overrides and defaults
fn resolve_config(
    config_file: Option<PathBuf>,
    home_override: Option<PathBuf>,
    api_key_override: Option<String>,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    let file = config_file.as_deref().map(load_config_file).transpose()?;

    // Stored image paths must stay valid from any working directory
    let home_override = home_override.map(|h| if h.is_absolute() { h } else { cwd.join(h) });

    let home = match (home_override, &file, &config_file) {
        (Some(home), _, _) => home,
        (None, Some(file), Some(config_path)) if file.paths.home.is_some() => {
            // Base directory is the parent of .apod/ (i.e., grandparent of config.yaml)
            let base_dir = config_path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."));
            resolve_path(base_dir, file.paths.home.as_deref().unwrap_or("."))
        }
        _ => default_home()?,
    };

    let defaults = ApiSettings::default();
    let api_file = file.as_ref().and_then(|f| f.api.clone());
    let api = ApiSettings {
        key: api_key_override
            .or_else(|| api_file.as_ref().and_then(|a| a.key.clone()))
            .unwrap_or(defaults.key),
        base_url: api_file
            .as_ref()
            .and_then(|a| a.base_url.clone())
            .unwrap_or(defaults.base_url),
        timeout_seconds: api_file
            .as_ref()
            .and_then(|a| a.timeout_seconds)
            .unwrap_or(defaults.timeout_seconds),
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        api,
    })
}

/// Load configuration from all sources.
///
/// `home_override` comes from the command line (or APOD_HOME via clap).
pub fn load_config(home_override: Option<PathBuf>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file(&cwd);
    let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());

    resolve_config(config_file, home_override, api_key, &cwd)
}
