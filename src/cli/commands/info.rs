//! Info command implementation - query a processor

use anyhow::Result;

use crate::services::ProcessorSyncController;

pub async fn execute_info_command(
    controller: &ProcessorSyncController,
    index: usize,
) -> Result<()> {
    let info = controller.fetch_info(index).await?;

    println!("🔍 Processor {}", index + 1);
    println!("  Version:    {}", info.version);
    println!("  Device:     {}", info.device);
    println!(
        "  Configured: {}",
        if info.has_been_configured { "yes" } else { "no" }
    );

    Ok(())
}
