//! Append-only journal of logged food and workout entries.
//!
//! Entries are appended to a JSONL (JSON Lines) file under an exclusive
//! file lock; readers take a shared lock.

use crate::{LoggedEntry, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for newly logged entries
pub trait EntrySink {
    fn append(&mut self, entry: &LoggedEntry) -> Result<()>;
}

/// JSONL-based entry sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntrySink for JsonlSink {
    fn append(&mut self, entry: &LoggedEntry) -> Result<()> {
        append_record(&self.path, entry)?;
        tracing::debug!("Appended entry {} ({}) to journal", entry.id, entry.item_id);
        Ok(())
    }
}

/// Append one record as a JSON line under an exclusive lock
///
/// Creates the file and its parent directory if needed.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    file.lock_exclusive()?;

    let mut writer = BufWriter::new(&file);
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    file.unlock()?;
    Ok(())
}

/// Read every record of a JSONL file under a shared lock
///
/// A missing file yields no records. Lines that fail to parse are skipped
/// with a warning naming `log_name`.
pub fn read_records<T: DeserializeOwned>(path: &Path, log_name: &str) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping {} line {}: {}", log_name, line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    Ok(records)
}

/// Read all entries from a journal file
pub fn read_entries(path: &Path) -> Result<Vec<LoggedEntry>> {
    let entries: Vec<LoggedEntry> = read_records(path, "journal")?;
    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}
