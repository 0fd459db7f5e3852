//! Content-addressed image cache.
//!
//! Images are deduplicated by the SHA-256 of their bytes: however many
//! dates or URLs resolve to the same picture, it is stored once and indexed
//! once.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::index::{CacheIndex, IndexError};
use super::naming::{derive_path, derive_unique_path};
use crate::adapters::{ByteFetcher, MetadataSource};
use crate::config::CacheLayout;
use crate::domain::{CacheRecord, RecordId, UnsupportedMedia};

/// Why an ingest produced no record
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(#[from] UnsupportedMedia),

    #[error("Failed to write image {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    IndexFailure(#[from] IndexError),
}

/// Lowercase hex SHA-256 of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Image directory plus its index
pub struct ImageCache {
    image_dir: PathBuf,
    index: CacheIndex,
}

impl ImageCache {
    /// Create the image directory and index if missing, then open them.
    ///
    /// Safe to call repeatedly; existing files and records are kept.
    pub fn open(layout: &CacheLayout) -> Result<Self, IndexError> {
        std::fs::create_dir_all(&layout.image_dir).map_err(|source| IndexError::CreateDir {
            path: layout.image_dir.clone(),
            source,
        })?;

        let index = CacheIndex::open(&layout.index_path)?;
        debug!(dir = %layout.image_dir.display(), "Image cache ready");

        Ok(Self {
            image_dir: layout.image_dir.clone(),
            index,
        })
    }

    /// Directory holding the image files
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Fetch the APOD for `date` and make sure its image is cached.
    ///
    /// Returns the id of the record holding the image, whether it was
    /// already cached or has just been stored.
    #[instrument(skip(self, metadata, fetcher), fields(source = metadata.name()))]
    pub async fn ingest<M, F>(
        &self,
        metadata: &M,
        fetcher: &F,
        date: NaiveDate,
    ) -> Result<RecordId, IngestError>
    where
        M: MetadataSource + ?Sized,
        F: ByteFetcher + ?Sized,
    {
        let apod = metadata
            .fetch_metadata(date)
            .await
            .map_err(|e| IngestError::RemoteUnavailable(format!("{:#}", e)))?;

        let title = apod.title().to_string();
        let explanation = apod.explanation().to_string();
        let url = apod.image_url()?.to_string();
        info!(%title, %url, "Resolved APOD image");

        let bytes = fetcher
            .fetch_bytes(&url)
            .await
            .map_err(|e| IngestError::RemoteUnavailable(format!("{:#}", e)))?;

        let hash = content_hash(&bytes);
        debug!(%hash, size = bytes.len(), "Hashed image");

        if let Some(id) = self.index.find_by_hash(&hash)? {
            info!(%id, "Image already cached");
            return Ok(id);
        }

        let path = match self.free_path(&title, &url, &hash) {
            Slot::Orphan(path) => {
                debug!(path = %path.display(), "Reusing unindexed file with identical content");
                path
            }
            Slot::Free(path) => {
                write_atomically(&self.image_dir, &path, &bytes)?;
                info!(path = %path.display(), "Stored new image");
                path
            }
        };

        let record = CacheRecord {
            id: RecordId::generate(),
            title,
            explanation,
            file_path: path,
            content_hash: hash,
        };

        if let Err(e) = self.index.insert(&record) {
            if e.is_constraint_violation() {
                warn!(hash = %record.content_hash, "Image was indexed concurrently");
            }
            return Err(e.into());
        }

        Ok(record.id)
    }

    /// Id of the record whose image hashes to `hash`
    pub fn find_by_hash(&self, hash: &str) -> Result<Option<RecordId>, IndexError> {
        self.index.find_by_hash(hash)
    }

    /// Record by id
    pub fn get_record(&self, id: &RecordId) -> Result<Option<CacheRecord>, IndexError> {
        self.index.get(id)
    }

    /// Titles of every cached image
    pub fn titles(&self) -> Result<Vec<String>, IndexError> {
        self.index.titles()
    }

    /// Title-derived path for a new image, suffixed with a hash fragment
    /// when a different image already occupies the plain name.
    ///
    /// A file left behind by an earlier ingest whose index insert failed
    /// holds the same bytes and is picked up as is.
    fn free_path(&self, title: &str, url: &str, hash: &str) -> Slot {
        let path = derive_path(&self.image_dir, title, url);
        if !path.exists() {
            return Slot::Free(path);
        }
        if holds_content(&path, hash) {
            return Slot::Orphan(path);
        }

        let unique = derive_unique_path(&self.image_dir, title, url, hash);
        debug!(
            taken = %path.display(),
            using = %unique.display(),
            "File name already in use"
        );
        if holds_content(&unique, hash) {
            Slot::Orphan(unique)
        } else {
            Slot::Free(unique)
        }
    }
}

/// Where a new image goes
#[derive(Debug, PartialEq, Eq)]
enum Slot {
    /// Nothing usable there yet; write the bytes
    Free(PathBuf),
    /// Already holds exactly these bytes
    Orphan(PathBuf),
}

/// Whether the file at `path` exists and hashes to `hash`
fn holds_content(path: &Path, hash: &str) -> bool {
    std::fs::read(path)
        .map(|bytes| content_hash(&bytes) == hash)
        .unwrap_or(false)
}

/// Write `bytes` to `path` via a temp file in `dir`, so a failed write
/// never leaves a truncated image behind
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), IngestError> {
    let fail = |source: std::io::Error| IngestError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.flush().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_hex_sha256() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(content_hash(b"").len(), 64);
    }

    #[test]
    fn test_open_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = CacheLayout::under(temp.path().join("cache"));

        let first = ImageCache::open(&layout).unwrap();
        assert!(layout.image_dir.is_dir());
        assert!(layout.index_path.is_file());
        drop(first);

        let second = ImageCache::open(&layout).unwrap();
        assert_eq!(second.image_dir(), layout.image_dir.as_path());
        assert!(second.titles().unwrap().is_empty());
    }

    #[test]
    fn test_write_atomically() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("a.jpg");

        write_atomically(temp.path(), &path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        let missing = temp.path().join("missing");
        let err = write_atomically(&missing, &missing.join("b.jpg"), b"x").unwrap_err();
        assert!(matches!(err, IngestError::WriteFailure { .. }));
    }

    #[test]
    fn test_free_path_reuses_identical_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = CacheLayout::under(temp.path().join("cache"));
        let cache = ImageCache::open(&layout).unwrap();
        let url = "https://apod.nasa.gov/image/m31.jpg";

        let plain = layout.image_dir.join("Andromeda.jpg");
        assert_eq!(
            cache.free_path("Andromeda", url, &content_hash(b"m31")),
            Slot::Free(plain.clone())
        );

        std::fs::write(&plain, b"m31").unwrap();
        assert_eq!(
            cache.free_path("Andromeda", url, &content_hash(b"m31")),
            Slot::Orphan(plain.clone())
        );

        let other = content_hash(b"m33");
        assert_eq!(
            cache.free_path("Andromeda", url, &other),
            Slot::Free(derive_unique_path(&layout.image_dir, "Andromeda", url, &other))
        );
    }
}
