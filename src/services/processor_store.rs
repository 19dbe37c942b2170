//! Processor list ownership and snapshot publication

use log::{debug, warn};
use tokio::sync::watch;

use crate::errors::{ConsoleError, Result};
use crate::models::processor::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_VIDEO_PATH, ProcessorConfig, ProcessorList,
};
use crate::storage::{HOST_KEY, KeyValueStorage, PORT_KEY, VIDEO_PATH_KEY};

/// Single source of truth for the known processors.
///
/// Every update swaps in a whole new `ProcessorList`; readers either take a
/// snapshot or subscribe to be told when a new one is published.
pub struct ProcessorStore {
    publisher: watch::Sender<ProcessorList>,
}

impl ProcessorStore {
    /// Build the list from durable storage, falling back to defaults for
    /// every key that was never written
    pub fn initialize(storage: &dyn KeyValueStorage) -> Self {
        let processor = ProcessorConfig::new(
            read_or_default(storage, HOST_KEY, DEFAULT_HOST),
            read_or_default(storage, PORT_KEY, DEFAULT_PORT),
            read_or_default(storage, VIDEO_PATH_KEY, DEFAULT_VIDEO_PATH),
        );
        debug!(
            "Initialized processor store with {}:{} ({})",
            processor.host, processor.port, processor.video_path
        );
        Self::from_list(ProcessorList::new(vec![processor]))
    }

    pub fn from_list(list: ProcessorList) -> Self {
        let (publisher, _) = watch::channel(list);
        Self { publisher }
    }

    /// Current list
    pub fn snapshot(&self) -> ProcessorList {
        self.publisher.borrow().clone()
    }

    pub fn get(&self, index: usize) -> Option<ProcessorConfig> {
        self.publisher.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.publisher.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receiver that sees every list published after this call
    pub fn subscribe(&self) -> watch::Receiver<ProcessorList> {
        self.publisher.subscribe()
    }

    /// Replace the entry at `index` and publish the resulting list
    pub fn replace(&self, index: usize, config: ProcessorConfig) -> Result<ProcessorList> {
        let mut published = None;
        let mut len = 0;
        self.publisher.send_if_modified(|list| {
            len = list.len();
            match list.with_replaced(index, config) {
                Some(updated) => {
                    *list = updated.clone();
                    published = Some(updated);
                    true
                }
                None => false,
            }
        });

        published.ok_or(ConsoleError::IndexOutOfRange { index, len })
    }
}

fn read_or_default(storage: &dyn KeyValueStorage, key: &str, default: &str) -> String {
    match storage.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => default.to_string(),
        Err(e) => {
            warn!("Failed to read '{}' from storage, using default: {}", key, e);
            default.to_string()
        }
    }
}
