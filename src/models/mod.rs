//! Data models and types used throughout procsync

pub mod notification;
pub mod processor;
pub mod responses;
pub mod sync;

// Re-export commonly used types
pub use notification::*;
pub use processor::*;
pub use responses::*;
pub use sync::*;
