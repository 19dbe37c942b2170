//! List command implementation - show known processors

use anyhow::Result;

use crate::services::ProcessorSyncController;
use crate::ui::CardField;

/// Print every processor in the store
pub fn execute_list_command(controller: &ProcessorSyncController) -> Result<()> {
    let processors = controller.store().snapshot();

    println!("📋 Processor configuration");
    println!("==========================\n");

    for (index, processor) in processors.iter().enumerate() {
        println!("Processor {}", index + 1);
        println!("  {}: {}", CardField::Host, processor.host);
        println!("  {}: {}", CardField::Port, processor.port);
        println!("  {}: {}", CardField::VideoPath, processor.video_path);
        println!();
    }

    Ok(())
}
