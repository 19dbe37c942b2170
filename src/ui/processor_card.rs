//! Display/Edit toggle for one processor

use log::debug;
use std::fmt;

use crate::errors::Result;
use crate::models::processor::ProcessorConfig;
use crate::models::sync::SyncOutcome;
use crate::services::sync_controller::ProcessorSyncController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardMode {
    #[default]
    Display,
    Edit,
}

/// Editable text field of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Host,
    Port,
    VideoPath,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardField::Host => write!(f, "Host"),
            CardField::Port => write!(f, "Port"),
            CardField::VideoPath => write!(f, "Video Path"),
        }
    }
}

/// Local edit state of the card showing processor `index`
#[derive(Debug, Clone)]
pub struct ProcessorCard {
    index: usize,
    mode: CardMode,
    draft: ProcessorConfig,
}

impl ProcessorCard {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            mode: CardMode::Display,
            draft: ProcessorConfig::new("", "", ""),
        }
    }

    pub fn mode(&self) -> CardMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == CardMode::Edit
    }

    /// Unsaved values as currently typed
    pub fn draft(&self) -> &ProcessorConfig {
        &self.draft
    }

    /// Enter edit mode with fields seeded from `last_known`
    pub fn begin_edit(&mut self, last_known: &ProcessorConfig) {
        self.draft = last_known.clone().persisted(false);
        self.mode = CardMode::Edit;
    }

    /// Change one field of the draft; ignored outside edit mode
    pub fn set_field(&mut self, field: CardField, value: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        let value = value.into();
        match field {
            CardField::Host => self.draft.host = value,
            CardField::Port => self.draft.port = value,
            CardField::VideoPath => self.draft.video_path = value,
        }
        true
    }

    pub fn set_persist_locally(&mut self, persist_locally: bool) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.draft.persist_locally = persist_locally;
        true
    }

    /// The draft if every field is filled in, `None` otherwise
    pub fn candidate(&self) -> Option<ProcessorConfig> {
        self.draft
            .is_complete()
            .then(|| self.draft.clone())
    }

    /// Throw the draft away and go back to display mode
    pub fn cancel(&mut self) {
        debug!("Processor {}: edit cancelled", self.index);
        self.draft = ProcessorConfig::new("", "", "");
        self.mode = CardMode::Display;
    }

    /// Submit the draft. Stays in edit mode unless the save succeeded.
    /// Returns `None` when the card is not being edited.
    pub async fn save(
        &mut self,
        controller: &ProcessorSyncController,
    ) -> Result<Option<SyncOutcome>> {
        if !self.is_editing() {
            return Ok(None);
        }
        let outcome = controller.attempt_save(self.candidate(), self.index).await?;
        if outcome.is_success() {
            self.mode = CardMode::Display;
        }
        Ok(Some(outcome))
    }
}
