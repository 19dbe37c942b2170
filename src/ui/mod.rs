//! User Interface module
//!
//! Presentation-side state that still carries logic worth testing: the
//! per-processor edit toggle. Rendering itself lives in the CLI.

pub mod processor_card;

pub use processor_card::*;
