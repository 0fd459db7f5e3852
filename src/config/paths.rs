//! On-disk layout of the image cache.
//!
//! ```text
//! <home>/
//! ├── image_cache.db     # SQLite index of cached images
//! └── images/            # one file per unique image
//! ```

use std::path::{Path, PathBuf};

/// Name of the image directory under the cache home
pub const IMAGE_DIR_NAME: &str = "images";

/// Name of the SQLite index file under the cache home
pub const INDEX_FILE_NAME: &str = "image_cache.db";

/// Resolved locations of the image directory and its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    /// Cache home directory
    pub home: PathBuf,
    /// Directory holding the image files
    pub image_dir: PathBuf,
    /// SQLite database file
    pub index_path: PathBuf,
}

impl CacheLayout {
    /// Standard layout rooted at `home`
    pub fn under(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        Self {
            image_dir: home.join(IMAGE_DIR_NAME),
            index_path: home.join(INDEX_FILE_NAME),
            home,
        }
    }
}
