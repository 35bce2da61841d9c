//! One-YAML-file-per-record persistence shared by the entity modules.
//!
//! The record store is the single source of truth: every component reads a
//! fresh snapshot from disk, and each mutation is an independent
//! single-record write. There is no version field; concurrent writers
//! resolve last-write-wins.

use crate::error::Result;
use crate::io;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read one record, `None` if the file does not exist. Callers map the
/// `None` to their own NotFound variant.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    Ok(Some(serde_yaml::from_str(&data)?))
}

/// Serialize and atomically write one record.
pub fn write<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let data = serde_yaml::to_string(record)?;
    io::atomic_write(path, data.as_bytes())
}

/// Remove one record. Returns `false` if the file was already gone.
pub fn remove(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    Ok(true)
}

/// Read every `.yaml` record in a directory. A missing directory is an
/// empty collection, not an error. Order is unspecified; callers sort.
pub fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut records = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            let data = std::fs::read_to_string(&path)?;
            records.push(serde_yaml::from_str(&data)?);
        }
    }
    Ok(records)
}
