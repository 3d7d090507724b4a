//! Session configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "quiescence_ms": 100,
//!   "parameters": { "low_threshold": 50.0, "high_threshold": 150.0, "binarization_level": 128 },
//!   "keep_last_on_failure": false
//! }
//! ```

use crate::{SessionError, SessionResult};
use roiedge_core::DetectionParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default debounce window in milliseconds
pub const DEFAULT_QUIESCENCE_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Debounce window for continuous edits
    pub quiescence_ms: u64,
    /// Parameters a new session starts with
    pub parameters: DetectionParameters,
    /// Keep showing the last edge map when a later request fails
    pub keep_last_on_failure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quiescence_ms: DEFAULT_QUIESCENCE_MS,
            parameters: DetectionParameters::default(),
            keep_last_on_failure: false,
        }
    }
}

impl SessionConfig {
    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }

    /// Check the initial parameters.
    pub fn validate(&self) -> SessionResult<()> {
        self.parameters.validate()?;
        Ok(())
    }
}

/// Read a [`SessionConfig`] from a JSON file.
pub fn load_config(path: &Path) -> SessionResult<SessionConfig> {
    let data = fs::read_to_string(path).map_err(|source| SessionError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SessionConfig =
        serde_json::from_str(&data).map_err(|source| SessionError::Config {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
