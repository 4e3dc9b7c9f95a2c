use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Tunables for the engine. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// How long `open` waits for the first tab-updated event of a new window.
    pub ready_timeout_ms: u64,
    pub pin_retry_attempts: u32,
    pub pin_retry_interval_ms: u64,
    /// Sync runs when minutes-since-hour is a multiple of this.
    pub sync_interval_minutes: u32,
    pub max_failed_attempts: u32,
    pub lockout_ms: i64,
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ready_timeout_ms: 6000,
            pin_retry_attempts: 6,
            pin_retry_interval_ms: 200,
            sync_interval_minutes: 5,
            max_failed_attempts: 5,
            lockout_ms: 5 * 60 * 1000,
            data_dir: None,
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn pin_retry_interval(&self) -> Duration {
        Duration::from_millis(self.pin_retry_interval_ms)
    }
}
