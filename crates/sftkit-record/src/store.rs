//! Append-only JSONL store with tolerant loading
//!
//! Datasets are built incrementally: the builder appends new records to an
//! existing file and skips ids that are already present. Loading never fails
//! on a single bad line — broken lines are counted and skipped so one corrupt
//! record cannot block review of the rest.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::record::SftRecord;

/// Result of loading a JSONL file.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Records that parsed cleanly, in file order.
    pub records: Vec<SftRecord>,
    /// Number of non-blank lines that failed to parse.
    pub skipped: usize,
}

/// A JSONL dataset file on disk.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the file.
    ///
    /// Blank lines are ignored; lines that fail to parse are counted in
    /// `skipped`. A missing file is an error (use [`existing_ids`] when the
    /// store may not exist yet).
    ///
    /// [`existing_ids`]: JsonlStore::existing_ids
    pub fn load(&self) -> Result<LoadOutcome> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open dataset file: {:?}", self.path))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        let mut skipped = 0;
        for line in reader.lines() {
            let line = line.with_context(|| format!("Failed to read line from {:?}", self.path))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SftRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }

        Ok(LoadOutcome { records, skipped })
    }

    /// Collect the set of ids already present in the file.
    ///
    /// A store that does not exist yet yields an empty set. Lines that fail
    /// to parse or lack an `id` are ignored, matching [`load`].
    ///
    /// [`load`]: JsonlStore::load
    pub fn existing_ids(&self) -> Result<HashSet<String>> {
        let mut ids = HashSet::new();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open dataset file: {:?}", self.path))
            }
        };

        let reader = BufReader::new(file);
        for line in reader.lines() {
            let line = line.with_context(|| format!("Failed to read line from {:?}", self.path))?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&line) {
                if let Some(id) = value.get("id").and_then(|v| v.as_str()) {
                    ids.insert(id.to_string());
                }
            }
        }

        Ok(ids)
    }

    /// Append records to the file, one compact JSON object per line.
    ///
    /// The file is created if absent; existing lines are never rewritten.
    /// Returns the number of records written.
    pub fn append(&self, records: &[SftRecord]) -> Result<usize> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open dataset file for append: {:?}", self.path))?;
        let mut writer = BufWriter::new(file);

        for record in records {
            let line = serde_json::to_string(record)
                .with_context(|| format!("Failed to serialize record {:?}", record.id))?;
            writer
                .write_all(line.as_bytes())
                .and_then(|_| writer.write_all(b"\n"))
                .with_context(|| format!("Failed to write record to {:?}", self.path))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush dataset file: {:?}", self.path))?;

        Ok(records.len())
    }
}
