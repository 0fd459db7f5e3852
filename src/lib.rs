//! apod - NASA Astronomy Picture of the Day with a local image cache
//!
//! Fetches the APOD metadata and image for a date and stores the image in
//! a content-addressed cache.
//!
//! # Architecture
//!
//! The cache is built around content hashing:
//! - Every image is identified by the SHA-256 of its bytes
//! - Each unique image is written to disk once and indexed once in SQLite
//! - Dates or URLs that resolve to an already cached image reuse its record
//!
//! # Modules
//!
//! - `adapters`: External systems (NASA API, desktop background)
//! - `cache`: Content-addressed image cache (index, naming, ingest)
//! - `config`: Configuration and on-disk layout
//! - `domain`: Data structures (metadata, records, dates)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Cache today's picture and set it as the desktop background
//! apod fetch
//!
//! # Cache a specific day without touching the desktop
//! apod fetch 2024-04-16 --no-wallpaper
//!
//! # List everything in the cache
//! apod list
//! ```

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{ByteFetcher, DesktopWallpaper, MetadataSource, NasaClient};
pub use cache::{ImageCache, IndexError, IngestError};
pub use config::{CacheLayout, ResolvedConfig};
pub use domain::{ApodMetadata, CacheRecord, InvalidDate, MediaType, RecordId};
