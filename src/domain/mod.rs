//! Domain types for apod.
//!
//! This module contains the core data structures:
//! - Metadata: what the APOD API says about a day
//! - Record: one cached, deduplicated image
//! - Date: archive date validation

pub mod date;
pub mod metadata;
pub mod record;

// Re-export commonly used types
pub use date::{InvalidDate, FIRST_APOD_DATE};
pub use metadata::{ApodMetadata, MediaType, UnsupportedMedia};
pub use record::{CacheRecord, RecordId};
