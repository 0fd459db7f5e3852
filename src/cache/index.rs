//! SQLite index of cached images.
//!
//! One table, one row per unique image, keyed by a random id with a
//! UNIQUE constraint on the content hash.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::debug;

use crate::domain::{CacheRecord, RecordId};

/// Errors from the cache index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache index error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl IndexError {
    /// True if the error is a UNIQUE/PRIMARY KEY violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            IndexError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS apod_images (
        id           TEXT PRIMARY KEY,
        title        TEXT NOT NULL,
        explanation  TEXT NOT NULL,
        file_path    TEXT NOT NULL,
        content_hash TEXT NOT NULL UNIQUE
    );
";

/// Connection to the cache index
pub struct CacheIndex {
    conn: Connection,
}

impl CacheIndex {
    /// Open the index at `path`, creating the file and table if needed
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        debug!(path = %path.display(), "Opening cache index");
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory index (tests)
    pub fn open_in_memory() -> Result<Self, IndexError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, IndexError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Id of the record holding `content_hash`, if any
    pub fn find_by_hash(&self, content_hash: &str) -> Result<Option<RecordId>, IndexError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM apod_images WHERE content_hash = ?1",
                [content_hash],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(id.map(RecordId::from_string))
    }

    /// Insert a new record
    pub fn insert(&self, record: &CacheRecord) -> Result<(), IndexError> {
        self.conn.execute(
            "INSERT INTO apod_images (id, title, explanation, file_path, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.as_str(),
                record.title,
                record.explanation,
                record.file_path.to_string_lossy().into_owned(),
                record.content_hash,
            ],
        )?;
        Ok(())
    }

    /// Record by id
    pub fn get(&self, id: &RecordId) -> Result<Option<CacheRecord>, IndexError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, title, explanation, file_path, content_hash
                 FROM apod_images WHERE id = ?1",
                [id.as_str()],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    /// All titles, alphabetically
    pub fn titles(&self) -> Result<Vec<String>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM apod_images ORDER BY title COLLATE NOCASE")?;
        let titles = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    /// Number of records
    pub fn len(&self) -> Result<usize, IndexError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apod_images", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len()? == 0)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CacheRecord> {
        Ok(CacheRecord {
            id: RecordId::from_string(row.get::<_, String>(0)?),
            title: row.get(1)?,
            explanation: row.get(2)?,
            file_path: PathBuf::from(row.get::<_, String>(3)?),
            content_hash: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: &str, hash: &str) -> CacheRecord {
        CacheRecord {
            id: RecordId::generate(),
            title: title.to_string(),
            explanation: "explanation".to_string(),
            file_path: PathBuf::from(format!("/cache/{}.jpg", title)),
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let index = CacheIndex::open_in_memory().unwrap();
        let rec = record("Moon", "aaaa");
        index.insert(&rec).unwrap();

        assert_eq!(index.find_by_hash("aaaa").unwrap(), Some(rec.id.clone()));
        assert_eq!(index.find_by_hash("AAAA").unwrap(), None);
        assert_eq!(index.get(&rec.id).unwrap(), Some(rec));
        assert_eq!(index.get(&RecordId::generate()).unwrap(), None);
    }

    #[test]
    fn test_duplicate_hash_is_constraint_violation() {
        let index = CacheIndex::open_in_memory().unwrap();
        index.insert(&record("Moon", "aaaa")).unwrap();

        let err = index.insert(&record("Other Moon", "aaaa")).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(index.len().unwrap(), 1);
    }

    #[test]
    fn test_titles_sorted() {
        let index = CacheIndex::open_in_memory().unwrap();
        assert!(index.is_empty().unwrap());

        index.insert(&record("saturn", "3")).unwrap();
        index.insert(&record("Andromeda", "1")).unwrap();
        index.insert(&record("Moon", "2")).unwrap();

        assert_eq!(index.titles().unwrap(), vec!["Andromeda", "Moon", "saturn"]);
    }

    #[test]
    fn test_reopen_keeps_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.db");

        let rec = record("Moon", "aaaa");
        CacheIndex::open(&path).unwrap().insert(&rec).unwrap();

        let reopened = CacheIndex::open(&path).unwrap();
        assert_eq!(reopened.get(&rec.id).unwrap(), Some(rec));
    }
}
