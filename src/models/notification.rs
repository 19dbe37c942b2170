//! User-facing feedback produced by sync attempts

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A notification body is either one sentence or one line per reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationMessage {
    Single(String),
    Lines(Vec<String>),
}

impl NotificationMessage {
    /// Message as a list of display lines
    pub fn lines(&self) -> Vec<&str> {
        match self {
            NotificationMessage::Single(text) => vec![text.as_str()],
            NotificationMessage::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

impl From<&str> for NotificationMessage {
    fn from(text: &str) -> Self {
        NotificationMessage::Single(text.to_string())
    }
}

impl From<String> for NotificationMessage {
    fn from(text: String) -> Self {
        NotificationMessage::Single(text)
    }
}

impl From<Vec<String>> for NotificationMessage {
    fn from(lines: Vec<String>) -> Self {
        NotificationMessage::Lines(lines)
    }
}

/// Transient feedback rendered by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationState {
    pub visible: bool,
    pub severity: Severity,
    pub message: NotificationMessage,
}

impl NotificationState {
    /// Nothing to show
    pub fn hidden() -> Self {
        Self {
            visible: false,
            severity: Severity::Success,
            message: NotificationMessage::Single(String::new()),
        }
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::hidden()
    }
}
