//! Wire types for the processor HTTP API

use serde::{Deserialize, Serialize};

/// Body of `PUT /config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigUpdateRequest {
    pub app: AppSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    pub video_path: String,
}

impl ConfigUpdateRequest {
    pub fn for_video_path(video_path: impl Into<String>) -> Self {
        Self {
            app: AppSection {
                video_path: video_path.into(),
            },
        }
    }
}

/// Structured error body returned by the processor on validation failures
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub detail: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ErrorResponse {
    /// Parse a non-2xx body; `None` when it does not carry a `detail` list
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    pub fn messages(&self) -> Vec<String> {
        self.detail.iter().map(|d| d.msg.clone()).collect()
    }
}

/// Body of `GET /config/info`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorInfo {
    pub version: String,
    pub device: String,
    pub has_been_configured: bool,
}
