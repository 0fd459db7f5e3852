//! Command-line interface for apod.
//!
//! Provides commands for fetching the picture of the day into the cache,
//! setting it as the desktop background, viewing it, and inspecting the
//! cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::adapters::{DesktopWallpaper, NasaClient};
use crate::cache::ImageCache;
use crate::config::{self, ResolvedConfig};
use crate::domain::{date, CacheRecord, RecordId};

/// apod - NASA Astronomy Picture of the Day, cached locally
#[derive(Parser, Debug)]
#[command(name = "apod")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache home directory (default: ~/.apod)
    #[arg(long, global = true, env = "APOD_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cache the APOD for a date and set it as the desktop background
    Fetch {
        /// APOD date (YYYY-MM-DD, default: today)
        date: Option<String>,

        /// Only cache the image, leave the desktop alone
        #[arg(long)]
        no_wallpaper: bool,
    },

    /// Cache the APOD for a date and print its details
    View {
        /// APOD date (YYYY-MM-DD, default: today)
        date: Option<String>,
    },

    /// List the titles of all cached images
    List,

    /// Show a cached record by id
    Show {
        /// Record ID
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::load_config(self.home)?;

        match self.command {
            Commands::Fetch { date, no_wallpaper } => {
                fetch(&cfg, date.as_deref(), !no_wallpaper).await
            }
            Commands::View { date } => view(&cfg, date.as_deref()).await,
            Commands::List => list(&cfg),
            Commands::Show { id } => show(&cfg, &id),
            Commands::Config => show_config(&cfg),
        }
    }
}

/// Validate the date argument before anything touches the cache
fn apod_date(arg: Option<&str>) -> Result<NaiveDate> {
    let date = date::resolve(arg, date::today()).context("Script execution aborted")?;
    Ok(date)
}

/// Open the cache and ingest `date`, reporting failures to stderr.
///
/// Returns `None` when no record could be produced.
async fn ingest_date(cfg: &ResolvedConfig, date: NaiveDate) -> Result<Option<CacheRecord>> {
    let cache = ImageCache::open(&cfg.layout())?;
    let client = NasaClient::from_settings(&cfg.api)?;

    eprintln!("APOD date: {}", date);

    let id = match cache.ingest(&client, &client, date).await {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Failed to cache APOD for {}: {}", date, e);
            return Ok(None);
        }
    };

    let record = cache.get_record(&id)?;
    if record.is_none() {
        eprintln!("Record {} vanished from the cache index", id);
    }
    Ok(record)
}

/// Cache the APOD and optionally set the desktop background
async fn fetch(cfg: &ResolvedConfig, date_arg: Option<&str>, set_wallpaper: bool) -> Result<()> {
    let date = apod_date(date_arg)?;

    let Some(record) = ingest_date(cfg, date).await? else {
        return Ok(());
    };

    println!("{}", record.title);
    println!("{}", record.file_path.display());

    if set_wallpaper {
        if let Err(e) = DesktopWallpaper::new().apply(&record.file_path).await {
            eprintln!("Failed to set desktop background: {:#}", e);
        }
    }

    Ok(())
}

/// Text viewer: cache the APOD and print what a viewer would display
async fn view(cfg: &ResolvedConfig, date_arg: Option<&str>) -> Result<()> {
    let date = apod_date(date_arg)?;

    let Some(record) = ingest_date(cfg, date).await? else {
        return Ok(());
    };

    if !record.file_path.exists() {
        anyhow::bail!("Image file not found: {}", record.file_path.display());
    }

    print_record(&record);
    Ok(())
}

/// List cached titles
fn list(cfg: &ResolvedConfig) -> Result<()> {
    let cache = ImageCache::open(&cfg.layout())?;
    let titles = cache.titles()?;

    if titles.is_empty() {
        println!("Cache is empty. Use 'apod fetch [DATE]' to add an image.");
        return Ok(());
    }

    for title in &titles {
        println!("{}", title);
    }
    println!("\nTotal: {} images", titles.len());

    Ok(())
}

/// Show a record by id
fn show(cfg: &ResolvedConfig, id: &str) -> Result<()> {
    let cache = ImageCache::open(&cfg.layout())?;
    let record = cache
        .get_record(&RecordId::from_string(id))?
        .ok_or_else(|| anyhow::anyhow!("Record not found: {}", id))?;

    print_record(&record);
    Ok(())
}

fn print_record(record: &CacheRecord) {
    println!("ID:     {}", record.id);
    println!("Title:  {}", record.title);
    println!("File:   {}", record.file_path.display());
    println!("SHA256: {}", record.content_hash);
    println!();
    println!("{}", record.explanation);
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    let layout = cfg.layout();

    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:   {}", layout.home.display());
    println!("  Images: {}", layout.image_dir.display());
    println!("  Index:  {}", layout.index_path.display());
    println!();
    println!("API:");
    println!("  URL:     {}", cfg.api.base_url);
    println!(
        "  Key:     {}",
        if cfg.api.key == config::DEFAULT_API_KEY {
            "DEMO_KEY (default)"
        } else {
            "(custom)"
        }
    );
    println!("  Timeout: {}s", cfg.api.timeout_seconds);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from(["apod", "fetch", "2024-04-16", "--no-wallpaper"]).unwrap();
        match cli.command {
            Commands::Fetch { date, no_wallpaper } => {
                assert_eq!(date.as_deref(), Some("2024-04-16"));
                assert!(no_wallpaper);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_home() {
        let cli = Cli::try_parse_from(["apod", "list", "--home", "/tmp/apod"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/apod")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_date_defaults_to_today() {
        assert_eq!(apod_date(None).unwrap(), date::today());
        assert!(apod_date(Some("1995-06-15")).is_err());
    }
}
