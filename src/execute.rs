//! Action execution against the replica tree
//!
//! Each action is applied independently: a failure is captured in the
//! returned outcome record and never propagated, so one bad path cannot
//! block the rest of the batch. The next scheduled pass retries naturally.

use crate::error::SyncError;
use crate::plan::Action;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Result of applying one action
#[derive(Debug, Clone)]
pub struct Outcome {
    pub action: Action,
    pub succeeded: bool,
    /// Short human-relevant note: byte count, "already absent", or the
    /// error text on failure
    pub detail: String,
}

impl Outcome {
    /// Format this outcome as one human-readable log line, resolving the
    /// relative path against the concrete roots.
    pub fn describe(&self, source_root: &Path, replica_root: &Path) -> String {
        let rel = self.action.path();
        let replica_path = rel.resolve_under(replica_root);
        if !self.succeeded {
            return format!("Error while applying {}: {}", self.action, self.detail);
        }
        match &self.action {
            Action::CopyFile(_) => format!(
                "Copied: {} -> {}",
                rel.resolve_under(source_root).display(),
                replica_path.display()
            ),
            Action::UpdateFile(_) => format!(
                "Updated: {} -> {}",
                rel.resolve_under(source_root).display(),
                replica_path.display()
            ),
            Action::DeleteFile(_) => format!("Removed: {}", replica_path.display()),
            Action::CreateDir(_) => format!("Created directory: {}", replica_path.display()),
            Action::DeleteDir(_) => format!("Removed directory: {}", replica_path.display()),
        }
    }
}

/// Apply one action, converting any failure into the outcome record
pub fn apply(action: &Action, source_root: &Path, replica_root: &Path) -> Outcome {
    let rel = action.path();
    let replica_path = rel.resolve_under(replica_root);

    let result = match action {
        Action::CopyFile(_) | Action::UpdateFile(_) => {
            copy_contents(&rel.resolve_under(source_root), &replica_path)
        }
        Action::DeleteFile(_) => delete_file(&replica_path),
        Action::CreateDir(_) => create_dir(&replica_path),
        Action::DeleteDir(_) => delete_dir_recursive(&replica_path),
    };

    match result {
        Ok(detail) => {
            trace!(action = %action, %detail, "Action applied");
            Outcome {
                action: action.clone(),
                succeeded: true,
                detail,
            }
        }
        Err(e) => {
            warn!(action = %action, "Action failed: {}", e);
            Outcome {
                action: action.clone(),
                succeeded: false,
                detail: e.to_string(),
            }
        }
    }
}

/// Stream bytes from `source` to `dest`, creating missing parents.
///
/// The destination is truncated on open, so re-running a copy and replacing
/// drifted content are the same operation.
fn copy_contents(source: &Path, dest: &Path) -> Result<String, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut reader = BufReader::new(File::open(source)?);
    let mut writer = BufWriter::new(File::create(dest)?);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    Ok(format!("{} bytes", bytes))
}

/// Create a directory including missing intermediate segments; "already
/// exists" is success
fn create_dir(path: &Path) -> Result<String, SyncError> {
    fs::create_dir_all(path)?;
    Ok("created".to_string())
}

/// Remove a file, treating "already absent" as success (idempotent)
fn delete_file(path: &Path) -> Result<String, SyncError> {
    match fs::remove_file(path) {
        Ok(()) => Ok("removed".to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok("already absent".to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Remove a directory and everything beneath it.
///
/// Explicit post-order traversal: every child is removed before its parent,
/// so the final `remove_dir` calls only ever see empty directories. "Already
/// absent" is success.
fn delete_dir_recursive(dir: &Path) -> Result<String, SyncError> {
    if dir.symlink_metadata().is_err() {
        return Ok("already absent".to_string());
    }

    for entry in WalkDir::new(dir).follow_links(false).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }

    Ok("removed".to_string())
}
