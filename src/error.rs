//! Error types for the directory synchronization pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Synchronization errors
///
/// Per-action I/O failures are caught at the executor boundary and turned
/// into outcome records; only structurally fatal conditions (a missing
/// source root) abort a pass.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source root not found: {0:?}")]
    SourceMissing(PathBuf),

    #[error("Root not found: {0:?}")]
    RootNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pass completed with {failed} of {total} actions failed")]
    PartialPass { failed: usize, total: usize },
}
