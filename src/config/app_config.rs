//! Application configuration management

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Result;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location of the durable key/value storage file
    pub storage_path: Option<PathBuf>,
    /// Remote request configuration
    pub remote: RemoteConfig,
    /// UI configuration
    pub ui: UiConfig,
}

/// Remote request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Notification auto-dismiss delay; 0 keeps notifications until dismissed
    pub notification_dismiss_ms: u64,
    /// Log level
    pub log_level: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_dismiss_ms: 4000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/procsync/procsync.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::APP_NAME)
            .join("procsync.toml")
    }

    /// Read the TOML file at `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.request_timeout_secs.max(1))
    }

    pub fn notification_dismiss_after(&self) -> Option<Duration> {
        match self.ui.notification_dismiss_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(crate::storage::FileStorage::default_path)
    }
}
