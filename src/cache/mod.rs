//! Content-addressed image cache.
//!
//! # Storage Layout
//!
//! ```text
//! <home>/
//! ├── image_cache.db            # SQLite index, one row per unique image
//! └── images/
//!     └── <Sanitised_Title>.<ext>
//! ```
//!
//! Records are keyed by a random id and deduplicated on the SHA-256 of
//! the image bytes. Nothing is ever updated or evicted.

pub mod index;
pub mod naming;
pub mod store;

pub use index::{CacheIndex, IndexError};
pub use naming::{derive_path, derive_unique_path};
pub use store::{content_hash, ImageCache, IngestError};
