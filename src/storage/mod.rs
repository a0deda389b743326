//! Record store access.
//!
//! The store holds two read-only tables, `ball_events` and
//! `match_records`. Reports describe what they need as a [`Query`] and
//! receive the matching rows as named-field [`Record`]s.
//!
//! Backends:
//! - [`MemoryStore`]: in-memory tables for fixtures and tests
//! - [`LakeStore`]: filesystem data lake (JSONL source of truth, Parquet copy)

mod jsonl;
mod lake;
mod memory;
mod parquet;
mod query;

use std::path::PathBuf;
use thiserror::Error;

pub use jsonl::{read_records, write_records, JsonlBatch};
pub use lake::{build_parquet, LakeStore, StoreBackend};
pub use memory::MemoryStore;
pub use self::parquet::{ParquetReader, ParquetWriter};
pub use query::{Filter, Query, TableName};

pub use crate::models::Record;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Errors surfaced by [`RecordStore::fetch`].
#[derive(Debug, Error)]
pub enum DataError {
    /// The store cannot be reached or read. Fatal to the whole run.
    #[error("Data unavailable: {0}")]
    Unavailable(String),

    /// The request itself is malformed. Fatal to one report only.
    #[error("Query error: {0}")]
    Query(String),
}

impl From<StorageError> for DataError {
    fn from(e: StorageError) -> Self {
        DataError::Unavailable(e.to_string())
    }
}

/// A read-only source of records.
///
/// Implementations return rows in store order, filtered by the query's
/// predicates and projected to its columns.
pub trait RecordStore {
    fn fetch(&self, query: &Query) -> Result<Vec<Record>, DataError>;
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn parquet_dir(&self) -> PathBuf {
        self.data_dir.join("parquet")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.normalized_dir(), PathBuf::from("/data/normalized"));
        assert_eq!(config.parquet_dir(), PathBuf::from("/data/parquet"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_storage_error_becomes_unavailable() {
        let err: DataError = StorageError::PathNotFound(PathBuf::from("/nope")).into();
        assert!(matches!(err, DataError::Unavailable(_)));
        assert!(err.to_string().contains("/nope"));
    }
}
