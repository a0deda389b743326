//! Parquet copy of the record store.
//!
//! Parquet files are derived from JSONL and rebuilt from it on demand.
//! Every column is stored as nullable UTF-8 text, so dirty values survive
//! the conversion unchanged and are coerced on read like any other source.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::basic::Compression;
use ::parquet::file::properties::WriterProperties;
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use tracing::{debug, info};

use super::{StorageConfig, StorageError, TableName};
use crate::models::{Field, Record};

/// Arrow schema for a table: one nullable text column per field.
pub fn table_schema(table: TableName) -> Schema {
    Schema::new(
        table
            .columns()
            .iter()
            .map(|name| ArrowField::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    )
}

fn to_text(field: &Field) -> Option<String> {
    match field {
        Field::Null => None,
        Field::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parquet_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Parquet(e.to_string())
}

fn table_path(config: &StorageConfig, table: TableName) -> PathBuf {
    config.parquet_dir().join(table.parquet_filename())
}

/// Parquet file writer.
pub struct ParquetWriter {
    config: StorageConfig,
}

impl ParquetWriter {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Write every record of a table, replacing any previous file.
    pub fn write_table(&self, table: TableName, records: &[Record]) -> Result<(), StorageError> {
        let path = table_path(&self.config, table);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let schema = Arc::new(table_schema(table));

        let columns: Vec<ArrayRef> = table
            .columns()
            .iter()
            .map(|name| {
                let values: Vec<Option<String>> = records
                    .iter()
                    .map(|r| r.get(*name).and_then(to_text))
                    .collect();
                Arc::new(StringArray::from(values)) as ArrayRef
            })
            .collect();

        let batch = RecordBatch::try_new(schema.clone(), columns).map_err(parquet_err)?;

        self.write_batch(&path, &schema, &batch)?;

        info!("Wrote {} {} rows to {:?}", records.len(), table, path);
        Ok(())
    }

    fn write_batch(
        &self,
        path: &Path,
        schema: &Arc<Schema>,
        batch: &RecordBatch,
    ) -> Result<(), StorageError> {
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer =
            ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(parquet_err)?;
        writer.write(batch).map_err(parquet_err)?;
        writer.close().map_err(parquet_err)?;

        Ok(())
    }
}

/// Parquet file reader.
pub struct ParquetReader {
    config: StorageConfig,
}

impl ParquetReader {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn exists(&self, table: TableName) -> bool {
        table_path(&self.config, table).exists()
    }

    /// Read every row of a table as records, in file order.
    pub fn read_table(&self, table: TableName) -> Result<Vec<Record>, StorageError> {
        let path = table_path(&self.config, table);
        if !path.exists() {
            return Err(StorageError::PathNotFound(path));
        }

        let file = File::open(&path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(parquet_err)?
            .build()
            .map_err(parquet_err)?;

        let mut records = Vec::new();
        for batch in reader {
            let batch = batch.map_err(parquet_err)?;
            records.extend(batch_to_records(table, &batch)?);
        }

        debug!("Read {} {} rows from {:?}", records.len(), table, path);
        Ok(records)
    }
}

fn batch_to_records(table: TableName, batch: &RecordBatch) -> Result<Vec<Record>, StorageError> {
    let mut records = vec![Record::new(); batch.num_rows()];

    for name in table.columns() {
        let Some(column) = batch.column_by_name(name) else {
            continue;
        };
        let strings = column
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| parquet_err(format!("column {} of {} is not text", name, table)))?;

        for (i, record) in records.iter_mut().enumerate() {
            let value = if strings.is_null(i) {
                Field::Null
            } else {
                Field::Text(strings.value(i).to_string())
            };
            record.insert(name.to_string(), value);
        }
    }

    Ok(records)
}
