//! CLI command implementations

pub mod edit;
pub mod info;
pub mod list;

use crate::cli::args::Commands;
use crate::models::notification::Severity;
use crate::models::sync::SyncOutcome;
use crate::services::ProcessorSyncController;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute_command(
    command: Commands,
    controller: &ProcessorSyncController,
) -> Result<()> {
    match command {
        Commands::List => list::execute_list_command(controller),
        Commands::Edit {
            index,
            host,
            port,
            video_path,
            persist,
        } => {
            edit::execute_edit_command(controller, index, host, port, video_path, persist).await
        }
        Commands::Info { index } => info::execute_info_command(controller, index).await,
    }
}

/// Render an outcome the way a notification would show it
pub fn render_outcome(outcome: &SyncOutcome) -> String {
    let icon = match outcome.severity {
        Severity::Success => "✅",
        Severity::Error => "❌",
    };
    let mut lines = outcome.message.lines().into_iter();
    let mut rendered = format!("{} {}", icon, lines.next().unwrap_or_default());
    for line in lines {
        rendered.push_str("\n   ");
        rendered.push_str(line);
    }
    rendered
}
