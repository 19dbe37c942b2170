//! Processor configuration models

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Host used when nothing has been stored yet
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Port used when nothing has been stored yet
pub const DEFAULT_PORT: &str = "8300";
/// Video path shown when nothing has been stored yet
pub const DEFAULT_VIDEO_PATH: &str = "Not defined";

/// Connection and behavior settings of one remote processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Network address of the processor
    pub host: String,
    /// Port kept as text so values like "08300" survive untouched
    pub port: String,
    /// Filesystem path on the processor where video is stored
    pub video_path: String,
    /// Whether an accepted change is also written to durable local storage
    #[serde(default)]
    pub persist_locally: bool,
}

impl ProcessorConfig {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        video_path: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            video_path: video_path.into(),
            persist_locally: false,
        }
    }

    /// Builder-style toggle for `persist_locally`
    pub fn persisted(mut self, persist_locally: bool) -> Self {
        self.persist_locally = persist_locally;
        self
    }

    /// True when host, port and video path are all non-blank
    pub fn is_complete(&self) -> bool {
        [&self.host, &self.port, &self.video_path]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    /// Base URL of the processor API, e.g. `http://10.0.0.4:8300`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host.trim(), self.port.trim())
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_VIDEO_PATH)
    }
}

/// Immutable, ordered snapshot of every known processor.
///
/// Cloning is cheap; replacing an entry produces a new snapshot and leaves
/// the old one intact for anyone still holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorList {
    entries: Arc<Vec<ProcessorConfig>>,
}

impl ProcessorList {
    pub fn new(entries: Vec<ProcessorConfig>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessorConfig> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessorConfig> {
        self.entries.iter()
    }

    /// Copy of this list with position `index` swapped for `config`.
    /// Returns `None` if `index` is outside the list.
    pub fn with_replaced(&self, index: usize, config: ProcessorConfig) -> Option<Self> {
        if index >= self.entries.len() {
            return None;
        }
        let mut entries = self.entries.as_ref().clone();
        entries[index] = config;
        Some(Self::new(entries))
    }
}

impl<'a> IntoIterator for &'a ProcessorList {
    type Item = &'a ProcessorConfig;
    type IntoIter = std::slice::Iter<'a, ProcessorConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
