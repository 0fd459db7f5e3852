//! Desktop background setter.
//!
//! Shells out to the platform's own tooling rather than linking against
//! desktop libraries.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

/// Desktop platforms we know how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Unsupported,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unsupported
        }
    }
}

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Sets the desktop background image
pub struct DesktopWallpaper {
    platform: Platform,
}

impl Default for DesktopWallpaper {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopWallpaper {
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }

    /// Commands that apply `image_path` as the background, in order.
    ///
    /// Returns an empty list on unsupported platforms.
    pub fn commands(&self, image_path: &Path) -> Vec<Invocation> {
        let path = image_path.display().to_string();

        match self.platform {
            Platform::Linux => {
                let uri = format!("file://{}", path);
                vec![
                    Invocation::new(
                        "gsettings",
                        &["set", "org.gnome.desktop.background", "picture-uri", &uri],
                    ),
                    Invocation::new(
                        "gsettings",
                        &["set", "org.gnome.desktop.background", "picture-uri-dark", &uri],
                    ),
                ]
            }
            Platform::MacOs => {
                let script = format!(
                    "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
                    path.replace('"', "\\\"")
                );
                vec![Invocation::new("osascript", &["-e", &script])]
            }
            Platform::Windows => {
                // SPI_SETDESKWALLPAPER = 20, SPIF_UPDATEINIFILE | SPIF_SENDCHANGE = 3
                let script = format!(
                    "Add-Type -TypeDefinition 'using System.Runtime.InteropServices; \
                     public class Wallpaper {{ [DllImport(\"user32.dll\", CharSet = CharSet.Unicode)] \
                     public static extern int SystemParametersInfo(int a, int b, string c, int d); }}'; \
                     [Wallpaper]::SystemParametersInfo(20, 0, '{}', 3)",
                    path.replace('\'', "''")
                );
                vec![Invocation::new(
                    "powershell",
                    &["-NoProfile", "-NonInteractive", "-Command", &script],
                )]
            }
            Platform::Unsupported => Vec::new(),
        }
    }

    /// Apply `image_path` as the desktop background
    pub async fn apply(&self, image_path: &Path) -> Result<()> {
        let commands = self.commands(image_path);
        if commands.is_empty() {
            anyhow::bail!("Setting the desktop background is not supported on this platform");
        }

        for invocation in commands {
            let output = Command::new(&invocation.program)
                .args(&invocation.args)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .output()
                .await
                .with_context(|| format!("Failed to run {}", invocation.program))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!(
                    "{} failed with exit code {}: {}",
                    invocation.program,
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                );
            }
        }

        info!(path = %image_path.display(), "Desktop background set");
        Ok(())
    }
}
