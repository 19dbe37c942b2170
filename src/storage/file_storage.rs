//! RON file storage backend

use super::KeyValueStorage;
use crate::errors::{ConsoleError, Result};
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// On-disk layout of the storage file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageDocument {
    /// Layout version for compatibility
    version: u32,
    /// Last time any entry was written
    last_updated: DateTime<Local>,
    entries: BTreeMap<String, String>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            version: 1,
            last_updated: Local::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// Key/value storage persisted as a single RON document
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// `<data_local_dir>/procsync/storage.ron`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::APP_NAME)
            .join("storage.ron")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StorageDocument> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let document: StorageDocument = ron::from_str(&content)?;
        Ok(document)
    }

    fn save(&self, mut document: StorageDocument) -> Result<()> {
        document.last_updated = Local::now();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let ron_string =
            ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.path, ron_string)?;
        debug!("Saved storage to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .guard
            .lock()
            .map_err(|e| ConsoleError::Storage(format!("storage lock poisoned: {}", e)))?;
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self
            .guard
            .lock()
            .map_err(|e| ConsoleError::Storage(format!("storage lock poisoned: {}", e)))?;
        let mut document = match self.load() {
            Ok(document) => document,
            Err(ConsoleError::Serialization(e)) => {
                warn!(
                    "Replacing unreadable storage file {}: {}",
                    self.path.display(),
                    e
                );
                StorageDocument::default()
            }
            Err(e) => return Err(e),
        };
        for (key, value) in entries {
            document.entries.insert(key.to_string(), value.to_string());
        }
        self.save(document)
    }
}
