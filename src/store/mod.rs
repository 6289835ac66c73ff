//! JSON record store access.
//!
//! The store is a single JSON file holding every artwork record. Two shapes
//! exist in the wild: a bare array of records (canonical) and an older
//! `{"records": [...]}` wrapper. Loading accepts both; saving always writes
//! the bare array, so any rewrite migrates a legacy file.
//!
//! Writes go through a temporary file in the same directory that is synced
//! and then renamed over the target, so readers never observe a half-written
//! store. There is no locking between concurrent writers.

mod record;

pub use record::ArtworkRecord;

use std::io::Write;
use std::path::{Path, PathBuf};

use artvault_common::{Error, Result};
use serde_json::Value;
use tempfile::NamedTempFile;

/// Key holding the record array in the legacy wrapped shape.
const LEGACY_RECORDS_KEY: &str = "records";

/// On-disk layout a store was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreShape {
    /// `[ {...}, {...} ]`
    Array,
    /// `{ "records": [ {...}, {...} ] }`
    Wrapped,
}

/// Records read from a store file together with the shape they were found in.
#[derive(Debug, Clone)]
pub struct LoadedStore {
    pub records: Vec<ArtworkRecord>,
    pub shape: StoreShape,
}

/// Handle to the record store file.
///
/// Every read goes to disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the store, accepting either shape.
    pub fn load(&self) -> Result<LoadedStore> {
        let content = std::fs::read_to_string(&self.path)?;
        let loaded = parse_store(&self.path, &content)?;
        tracing::debug!(
            path = %self.path.display(),
            records = loaded.records.len(),
            shape = ?loaded.shape,
            "Loaded record store"
        );
        Ok(loaded)
    }

    /// Read the records, discarding shape information.
    pub fn records(&self) -> Result<Vec<ArtworkRecord>> {
        self.load().map(|loaded| loaded.records)
    }

    /// Atomically replace the store with `records` in canonical shape.
    pub fn save(&self, records: &[ArtworkRecord]) -> Result<()> {
        let mut json = serde_json::to_string_pretty(records)?;
        json.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            bytes = json.len(),
            "Saved record store"
        );
        Ok(())
    }

    /// Rewrite a legacy wrapped store as a bare array.
    ///
    /// Returns `true` if the file was rewritten, `false` if it was already
    /// canonical.
    pub fn migrate_to_canonical(&self) -> Result<bool> {
        let loaded = self.load()?;
        match loaded.shape {
            StoreShape::Array => Ok(false),
            StoreShape::Wrapped => {
                self.save(&loaded.records)?;
                tracing::info!(
                    path = %self.path.display(),
                    records = loaded.records.len(),
                    "Migrated legacy wrapped store to array shape"
                );
                Ok(true)
            }
        }
    }
}

/// Parse store file content, recognising both shapes.
pub fn parse_store(path: &Path, content: &str) -> Result<LoadedStore> {
    let value: Value = serde_json::from_str(content)?;

    let (records, shape) = match value {
        Value::Array(items) => (Value::Array(items), StoreShape::Array),
        Value::Object(mut map) => {
            let Some(records) = map.remove(LEGACY_RECORDS_KEY) else {
                return Err(Error::invalid_store(
                    path,
                    "object store has no `records` key",
                ));
            };
            if !map.is_empty() {
                let dropped: Vec<&str> = map.keys().map(String::as_str).collect();
                tracing::warn!(
                    path = %path.display(),
                    keys = ?dropped,
                    "Legacy store wrapper has extra keys; they will not be written back"
                );
            }
            (records, StoreShape::Wrapped)
        }
        _ => {
            return Err(Error::invalid_store(
                path,
                "expected an array of records or an object with a `records` array",
            ))
        }
    };

    if !records.is_array() {
        return Err(Error::invalid_store(path, "`records` is not an array"));
    }

    let records: Vec<ArtworkRecord> = serde_json::from_value(records)
        .map_err(|e| Error::invalid_store(path, e.to_string()))?;

    if shape == StoreShape::Wrapped {
        tracing::warn!(
            path = %path.display(),
            "Record store uses the legacy wrapped shape; it will be rewritten as an array on next save"
        );
    }

    Ok(LoadedStore { records, shape })
}
