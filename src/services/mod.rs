//! Services module containing the processor synchronization core
//!
//! The store owns the processor list, the notification center owns the
//! user feedback, and the sync controller drives one save attempt at a time
//! against both.

pub mod notification_center;
pub mod processor_store;
pub mod sync_controller;

pub use notification_center::*;
pub use processor_store::*;
pub use sync_controller::*;
