//! Remote operations against processor services
//!
//! This module provides the HTTP transport used to push configuration
//! updates to processors and the cancellation signal used to abandon an
//! in-flight request.

pub mod cancel;
pub mod client;

pub use cancel::CancelSignal;
pub use client::*;
