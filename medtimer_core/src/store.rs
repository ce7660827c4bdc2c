//! Flat record store and profile persistence.
//!
//! Both documents are read and written whole, as pretty-printed UTF-8 JSON.
//! Saves are atomic from the caller's perspective (temp file in the same
//! directory, then rename) with file locking; malformed content on load
//! degrades to "no data" rather than surfacing an error.

use crate::{Error, MedicineEntry, Profile, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the medicine record collection inside the data directory
pub const RECORDS_FILE: &str = "med_data.json";

/// File name of the profile document inside the data directory
pub const PROFILE_FILE: &str = "profile.json";

/// Whole-document store for the flat medicine record collection
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store rooted at its conventional location inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(RECORDS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record collection.
    ///
    /// Returns an empty collection if the file doesn't exist. If the file is
    /// corrupted, logs a warning and returns an empty collection.
    pub fn load(&self) -> Result<Vec<MedicineEntry>> {
        Ok(read_document(&self.path)?.unwrap_or_default())
    }

    /// Replace the full persisted record collection
    pub fn save(&self, records: &[MedicineEntry]) -> Result<()> {
        write_document(&self.path, &records)?;
        tracing::debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

impl Profile {
    /// Load the profile from a file, defaulting on missing or corrupt data
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_document(path)?.unwrap_or_default())
    }

    /// Save the profile to a file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        write_document(path, self)?;
        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }
}

/// Read a whole JSON document under a shared lock.
///
/// Any failure to open, lock, read, or parse degrades to `None` with a
/// warning; the caller substitutes its empty shape.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        tracing::info!("No document found at {:?}, treating as empty", path);
        return Ok(None);
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Treating as empty.", path, e);
            return Ok(None);
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Treating as empty.", path, e);
        return Ok(None);
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Treating as empty.", path, e);
        return Ok(None);
    }

    if let Err(e) = file.unlock() {
        tracing::warn!("Failed to unlock {:?}: {}", path, e);
    }

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Treating as empty.", path, e);
            Ok(None)
        }
    }
}

/// Write a whole JSON document atomically:
/// 1. Write pretty JSON to a locked temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
