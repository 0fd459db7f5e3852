//! Cache records: one per unique image.

use std::path::PathBuf;

use uuid::Uuid;

/// Opaque record identifier (UUID v4, 32 hex chars, no dashes)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier read back from the index or the command line
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row of the cache index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub id: RecordId,

    /// Display title, also the source of the file name
    pub title: String,

    /// Free-text description, stored verbatim
    pub explanation: String,

    /// Absolute path of the cached image
    pub file_path: PathBuf,

    /// Lowercase hex SHA-256 of the image bytes (unique)
    pub content_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_hex() {
        let a = RecordId::generate();
        let b = RecordId::generate();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
