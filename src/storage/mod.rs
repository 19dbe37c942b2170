//! Durable key/value storage for accepted processor settings
//!
//! The console only ever stores three string values, one per field of the
//! last accepted processor configuration. Anything that can hold strings by
//! key can back it: a RON file on disk for the CLI, an in-memory map for
//! tests and embedders.

pub mod file_storage;
pub mod memory;

pub use file_storage::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::Result;

/// Storage key for the processor host
pub const HOST_KEY: &str = "host";
/// Storage key for the processor port
pub const PORT_KEY: &str = "port";
/// Storage key for the processor video path
pub const VIDEO_PATH_KEY: &str = "videoPath";

/// String key/value store surviving process restarts
pub trait KeyValueStorage: Send + Sync {
    /// Value stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite `key` unconditionally
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write several keys. Implementations backed by a single file should
    /// override this so the entries land in one write.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
