//! procsync - Processor Configuration Console
//!
//! procsync keeps a list of remote video processors, pushes configuration
//! updates to them over HTTP and remembers the last accepted settings in a
//! local key/value store. Updates are optimistic only after the processor
//! accepts them: a rejected or failed update leaves every piece of local
//! state exactly as it was.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod remote;
pub mod services;
pub mod storage;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;
pub use services::{NotificationCenter, ProcessorStore, ProcessorSyncController};

/// procsync version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// procsync application name
pub const APP_NAME: &str = "procsync";
