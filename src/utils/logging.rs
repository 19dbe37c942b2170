//! Logging initialization for the procsync CLI

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::str::FromStr;

/// Pick the log level from `-v`/`-q` flags, falling back to the configured level
pub fn select_level(verbose: u8, quiet: bool, configured: &str) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::from_str(configured).unwrap_or(LevelFilter::Info),
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Initialize stderr logging for the CLI
pub fn init_cli_logging(verbose: u8, quiet: bool, configured: &str) -> Result<()> {
    let level = select_level(verbose, quiet, configured);

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init()?;

    // Initialize panic logging
    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("procsync logging initialized with level: {:?}", level);
    Ok(())
}
