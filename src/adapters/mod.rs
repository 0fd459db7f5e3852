//! Adapter interfaces for external systems.
//!
//! The cache only talks to the outside world through these traits, so
//! tests can swap in fakes for the NASA API.

pub mod nasa;
pub mod wallpaper;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ApodMetadata;

// Re-export the concrete adapters
pub use nasa::NasaClient;
pub use wallpaper::DesktopWallpaper;

/// Source of APOD metadata for a calendar date
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch the metadata published for `date`
    async fn fetch_metadata(&self, date: NaiveDate) -> Result<ApodMetadata>;
}

/// Downloads raw bytes from a URL
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
