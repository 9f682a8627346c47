//! Synchronization configuration
//!
//! Settings come from an optional TOML file with CLI flags taking
//! precedence; defaults fill anything left unset.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the synchronization loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source tree treated as ground truth
    pub source: PathBuf,

    /// Replica tree kept converged to the source
    pub replica: PathBuf,

    /// Seconds between passes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Log file receiving a copy of the console output
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SyncConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("Invalid config file {:?}: {}", path, e)))
    }
}
