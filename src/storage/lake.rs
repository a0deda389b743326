//! Filesystem data lake.
//!
//! Layout under the data directory:
//!
//! ```text
//! normalized/ball_events*.jsonl     source of truth, one or more shards
//! normalized/match_records*.jsonl
//! parquet/ball_events.parquet       derived copy, see `build_parquet`
//! parquet/match_records.parquet
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    read_records, DataError, ParquetReader, ParquetWriter, Query, Record, RecordStore,
    StorageConfig, StorageError, TableName,
};

/// File format the lake store reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Jsonl,
    Parquet,
}

/// Record store backed by files under a data directory.
#[derive(Debug, Clone)]
pub struct LakeStore {
    config: StorageConfig,
    backend: StoreBackend,
}

impl LakeStore {
    /// Open the lake. The data directory must exist.
    pub fn open(config: StorageConfig, backend: StoreBackend) -> Result<Self, DataError> {
        if !config.data_dir.is_dir() {
            return Err(DataError::Unavailable(format!(
                "data directory {:?} does not exist",
                config.data_dir
            )));
        }
        info!("Opened data lake at {:?} ({:?})", config.data_dir, backend);
        Ok(Self { config, backend })
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    fn scan(&self, table: TableName) -> Result<Vec<Record>, StorageError> {
        match self.backend {
            StoreBackend::Jsonl => read_jsonl_table(&self.config, table),
            StoreBackend::Parquet => ParquetReader::new(self.config.clone()).read_table(table),
        }
    }
}

impl RecordStore for LakeStore {
    fn fetch(&self, query: &Query) -> Result<Vec<Record>, DataError> {
        query.validate()?;
        let rows = self.scan(query.table)?;
        let scanned = rows.len();
        let out = query.apply(rows)?;
        debug!(
            "Fetched {} of {} rows from {}",
            out.len(),
            scanned,
            query.table
        );
        Ok(out)
    }
}

/// JSONL shards of a table, in filename order.
fn jsonl_shards(config: &StorageConfig, table: TableName) -> Result<Vec<PathBuf>, StorageError> {
    let pattern = config
        .normalized_dir()
        .join(format!("{}*.jsonl", table.as_str()));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| StorageError::InvalidPath(format!("{:?}", pattern)))?;

    let entries =
        glob::glob(pattern).map_err(|e| StorageError::InvalidPath(format!("{}: {}", pattern, e)))?;

    let mut shards = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StorageError::Io(e.into_error()))?;
        shards.push(path);
    }
    shards.sort();
    Ok(shards)
}

/// Read every shard of a table. A table with no shards is missing.
fn read_jsonl_table(config: &StorageConfig, table: TableName) -> Result<Vec<Record>, StorageError> {
    let shards = jsonl_shards(config, table)?;
    if shards.is_empty() {
        return Err(StorageError::PathNotFound(
            config
                .normalized_dir()
                .join(format!("{}.jsonl", table.as_str())),
        ));
    }

    let mut records = Vec::new();
    let mut bad_lines = 0;
    for shard in &shards {
        let batch = read_records(shard)?;
        records.extend(batch.records);
        bad_lines += batch.bad_lines;
    }
    if bad_lines > 0 {
        warn!("{}: {} unreadable lines across {} shards", table, bad_lines, shards.len());
    }
    Ok(records)
}

/// Rebuild the Parquet copy of both tables from JSONL.
///
/// Returns the number of ball events and match records written.
pub fn build_parquet(config: &StorageConfig) -> Result<(usize, usize), StorageError> {
    let writer = ParquetWriter::new(config.clone());
    let mut counts = [0usize; 2];

    for (count, table) in counts.iter_mut().zip(TableName::ALL) {
        let records = read_jsonl_table(config, table)?;
        writer.write_table(table, &records)?;
        *count = records.len();
    }

    info!(
        "Built Parquet copy: {} ball events, {} match records",
        counts[0], counts[1]
    );
    Ok((counts[0], counts[1]))
}
