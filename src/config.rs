//! Configuration file support
//!
//! An optional JSON file tunes the Set Data Encryption page and logging.
//! Keys are never part of the configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, RustTdeError};
use crate::logger::LogFormat;
use crate::scsi::constants::SPP_ALGORITHM_INDEX_DEFAULT;
use crate::scsi::{NexusScope, SdeSettings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TdeConfig {
    pub nexus_scope: NexusScope,
    pub algorithm_index: u8,
    pub log_format: LogFormat,
}

impl Default for TdeConfig {
    fn default() -> Self {
        Self {
            nexus_scope: NexusScope::Local,
            algorithm_index: SPP_ALGORITHM_INDEX_DEFAULT,
            log_format: LogFormat::Text,
        }
    }
}

impl TdeConfig {
    /// Load the configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            RustTdeError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&content)?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| RustTdeError::config(format!("Invalid configuration: {}", e)))
    }

    pub fn sde_settings(&self) -> SdeSettings {
        SdeSettings {
            nexus_scope: self.nexus_scope,
            algorithm_index: self.algorithm_index,
        }
    }
}
