//! Command Line Interface module
//!
//! The CLI is the presentation layer: it renders the processor list and
//! notifications and forwards edits into the sync controller.

pub mod args;
pub mod commands;

pub use args::*;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::remote::HttpTransport;
use crate::services::{NotificationCenter, ProcessorStore, ProcessorSyncController};
use crate::storage::FileStorage;
use crate::utils::logging::init_cli_logging;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    init_cli_logging(cli.verbose, cli.quiet, &config.ui.log_level)?;

    let controller = build_controller(&cli, &config)?;
    let command = cli.command.clone().unwrap_or(Commands::List);
    commands::execute_command(command, &controller).await
}

/// Wire storage, store, transport and notifications into a controller
pub fn build_controller(cli: &Cli, config: &AppConfig) -> Result<ProcessorSyncController> {
    let storage_path = cli.storage.clone().unwrap_or_else(|| config.storage_path());
    log::debug!("Using storage at {}", storage_path.display());

    let storage = Arc::new(FileStorage::new(storage_path));
    let store = Arc::new(ProcessorStore::initialize(storage.as_ref()));
    let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
    let notifications = NotificationCenter::new(config.notification_dismiss_after());

    Ok(ProcessorSyncController::new(
        store,
        storage,
        transport,
        notifications,
    ))
}
