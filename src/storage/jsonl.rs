//! JSON Lines tables.
//!
//! One JSON object per line, one record per object. Values keep whatever
//! JSON type the export produced; coercion happens later, per metric.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::StorageError;
use crate::models::Record;

/// Records parsed from one file plus the number of lines rejected.
#[derive(Debug, Default)]
pub struct JsonlBatch {
    pub records: Vec<Record>,
    pub bad_lines: usize,
}

/// Parse every line of a JSONL file.
///
/// Blank lines are ignored. Lines that are not a JSON object are logged and
/// counted, never fatal. A missing file is [`StorageError::PathNotFound`].
pub fn read_records(path: &Path) -> Result<JsonlBatch, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let mut batch = JsonlBatch::default();
    for (number, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(&line) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("{:?} line {}: {}", path, number + 1, e);
                batch.bad_lines += 1;
            }
        }
    }

    debug!(
        "Parsed {} records from {:?} ({} bad lines)",
        batch.records.len(),
        path,
        batch.bad_lines
    );
    Ok(batch)
}

/// Write records to a JSONL file, replacing it. Parent directories are
/// created as needed. Returns the number of lines written.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<usize, StorageError>
where
    I: IntoIterator<Item = &'a Record>,
{
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;

    debug!("Wrote {} records to {:?}", written, path);
    Ok(written)
}
