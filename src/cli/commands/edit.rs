//! Edit command implementation - change a processor and push it

use anyhow::{Result, anyhow};
use log::info;

use super::render_outcome;
use crate::errors::ConsoleError;
use crate::services::ProcessorSyncController;
use crate::ui::{CardField, ProcessorCard};

/// Seed a card from the stored entry, apply the given fields and save
pub async fn execute_edit_command(
    controller: &ProcessorSyncController,
    index: usize,
    host: Option<String>,
    port: Option<String>,
    video_path: Option<String>,
    persist: bool,
) -> Result<()> {
    let last_known = controller
        .store()
        .get(index)
        .ok_or(ConsoleError::IndexOutOfRange {
            index,
            len: controller.store().len(),
        })?;

    let mut card = ProcessorCard::new(index);
    card.begin_edit(&last_known);
    for (field, value) in [
        (CardField::Host, host),
        (CardField::Port, port),
        (CardField::VideoPath, video_path),
    ] {
        if let Some(value) = value {
            card.set_field(field, value);
        }
    }
    card.set_persist_locally(persist);

    info!(
        "Sending configuration to processor {} at {}",
        index + 1,
        card.draft().base_url()
    );
    let outcome = card
        .save(controller)
        .await?
        .ok_or_else(|| anyhow!("Processor {} is not being edited", index + 1))?;

    println!("{}", render_outcome(&outcome));

    if outcome.is_success() {
        Ok(())
    } else {
        Err(anyhow!("Configuration of processor {} was not saved", index + 1))
    }
}
