//! Log sinks for provenance records.
//!
//! A sink has exactly one operation, [`LogSink::append`]. The file-backed sink
//! opens, writes one complete line, syncs and closes on every call, so
//! concurrent writers (threads or processes) never hold a lock across calls
//! and a record is durable once `append` returns.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crawlgate_core::ProvenanceRecord;
use tracing::debug;

use crate::StoreError;

/// Log file used when no path is configured.
pub const DEFAULT_LOG_PATH: &str = "provenance.json";

/// Destination for provenance records.
pub trait LogSink: Send + Sync {
    /// Append one record. Returns only once the record is durably stored.
    fn append(&self, record: &ProvenanceRecord) -> Result<(), StoreError>;
}

/// Newline-delimited JSON file, opened in append mode per record.
#[derive(Debug, Clone)]
pub struct JsonlFileSink {
    path: PathBuf,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for JsonlFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl LogSink for JsonlFileSink {
    fn append(&self, record: &ProvenanceRecord) -> Result<(), StoreError> {
        // Whole line is encoded up front and written with a single call.
        let line = record.to_json_line()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_err(e))?;
        file.sync_data().map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), url = %record.url, "appended provenance record");
        Ok(())
    }
}

/// In-process sink that keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<ProvenanceRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order.
    pub fn records(&self) -> Vec<ProvenanceRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn append(&self, record: &ProvenanceRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Other("memory sink lock poisoned".into()))?;
        records.push(record.clone());
        Ok(())
    }
}

/// Read an NDJSON provenance log back into records.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn read_records(path: &Path) -> Result<Vec<ProvenanceRecord>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_err)?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| StoreError::Json {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
