//! Configuration management for procsync

pub mod app_config;

pub use app_config::*;
