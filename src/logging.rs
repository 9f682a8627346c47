//! Logging setup
//!
//! Structured logging via the `tracing` crate. Console output is always on;
//! when a log file is configured the same stream is appended there as well,
//! without ANSI escapes. The `FOLDSYNC_LOG` environment variable overrides
//! the configured level filter.

use crate::error::SyncError;
use std::path::Path;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the global tracing subscriber
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), SyncError> {
    let filter = EnvFilter::try_from_env("FOLDSYNC_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let base = Registry::default().with(filter);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stdout);

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            base.with(console_layer)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(false)
                        .with_writer(file),
                )
                .init();
        }
        None => {
            base.with(console_layer).init();
        }
    }

    Ok(())
}

/// Open the log file for appending, creating parent directories as needed
fn open_log_file(path: &Path) -> Result<std::fs::File, SyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::Config(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SyncError::Config(format!("Failed to open log file {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sync.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sync.log");
        std::fs::write(&path, "existing line\n").unwrap();
        open_log_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing line\n");
    }
}
