//! Sync attempt lifecycle types

use super::notification::{NotificationMessage, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when the caller could not produce a complete candidate
pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
/// Shown when the processor accepted the configuration
pub const MSG_SAVED: &str = "Configuration saved successfully.";
/// First line of every failed remote save
pub const MSG_SAVE_FAILED: &str = "An error occurred while trying to save the configuration.";
/// Shown when the processor accepted the change but the local write failed
pub const MSG_LOCAL_WRITE_FAILED: &str =
    "The processor accepted the configuration but it could not be stored locally.";
/// Shown when a second save is requested for a processor that is still saving
pub const MSG_ATTEMPT_IN_PROGRESS: &str = "A save is already in progress for this processor.";

/// Where a processor's current save attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Rejected,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Validating => "validating",
            SyncPhase::Submitting => "submitting",
            SyncPhase::Succeeded => "succeeded",
            SyncPhase::Rejected => "rejected",
        };
        write!(f, "{}", name)
    }
}

/// Result of one save attempt, produced exactly once per call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub severity: Severity,
    pub message: NotificationMessage,
}

impl SyncOutcome {
    pub fn success(message: impl Into<NotificationMessage>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<NotificationMessage>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }

    pub fn fields_required() -> Self {
        Self::error(MSG_FIELDS_REQUIRED)
    }

    pub fn saved() -> Self {
        Self::success(MSG_SAVED)
    }

    /// Error outcome headed by the generic save failure line
    pub fn save_failed<I, S>(details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines = vec![MSG_SAVE_FAILED.to_string()];
        lines.extend(details.into_iter().map(Into::into));
        Self::error(lines)
    }
}
