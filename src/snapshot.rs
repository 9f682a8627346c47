//! Directory tree snapshots
//!
//! A snapshot captures the complete state of one tree at a point in time:
//! a mapping from relative file path to content fingerprint plus the set of
//! relative directory paths. Snapshots are rebuilt from scratch on every
//! pass; no incremental state is carried between passes.

use crate::error::SyncError;
use crate::fingerprint::{fingerprint_file, Fingerprint};
use crate::relpath::RelPath;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, instrument, trace, warn};
use walkdir::WalkDir;

/// Immutable state of one directory tree
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    /// Regular files keyed by relative path
    pub files: BTreeMap<RelPath, Fingerprint>,
    /// Directories other than the root itself
    pub dirs: BTreeSet<RelPath>,
}

impl TreeSnapshot {
    /// Walk `root` and build a snapshot of its current state.
    ///
    /// Records every regular file with its content fingerprint and every
    /// directory except the root. Symbolic links, special files, and entries
    /// that cannot be read are skipped with a warning rather than aborting
    /// the walk. Fails only when `root` itself does not exist.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn take(root: &Path) -> Result<Self, SyncError> {
        if !root.is_dir() {
            return Err(SyncError::RootNotFound(root.to_path_buf()));
        }

        let start = Instant::now();
        let mut snapshot = Self::default();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // The root itself is implied, not recorded
            if entry.path() == root {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                warn!(path = %entry.path().display(), "Skipping symbolic link");
                continue;
            }

            let rel = match RelPath::from_root(root, entry.path()) {
                Ok(r) => r,
                Err(e) => {
                    warn!(path = %entry.path().display(), "Skipping entry: {}", e);
                    continue;
                }
            };

            if file_type.is_dir() {
                snapshot.dirs.insert(rel);
            } else if file_type.is_file() {
                match fingerprint_file(entry.path()) {
                    Ok(fp) => {
                        trace!(path = %rel, fingerprint = %hex::encode(fp), "Fingerprinted file");
                        snapshot.files.insert(rel, fp);
                    }
                    Err(e) => {
                        warn!(path = %rel, "Skipping unreadable file: {}", e);
                    }
                }
            } else {
                warn!(path = %rel, "Skipping special file");
            }
        }

        debug!(
            file_count = snapshot.files.len(),
            dir_count = snapshot.dirs.len(),
            duration_ms = start.elapsed().as_millis(),
            "Snapshot complete"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_collects_files_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a").join("b")).unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("a").join("b").join("deep.txt"), "deep").unwrap();

        let snapshot = TreeSnapshot::take(root).unwrap();

        let files: Vec<_> = snapshot.files.keys().map(|r| r.as_str()).collect();
        assert_eq!(files, vec!["a/b/deep.txt", "top.txt"]);

        let dirs: Vec<_> = snapshot.dirs.iter().map(|r| r.as_str()).collect();
        assert_eq!(dirs, vec!["a", "a/b"]);
    }

    #[test]
    fn test_snapshot_records_empty_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("empty")).unwrap();

        let snapshot = TreeSnapshot::take(root).unwrap();
        assert!(snapshot.files.is_empty());
        assert!(snapshot.dirs.iter().any(|d| d.as_str() == "empty"));
    }

    #[test]
    fn test_snapshot_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = TreeSnapshot::take(&temp_dir.path().join("absent"));
        assert!(matches!(result, Err(SyncError::RootNotFound(_))));
    }

    #[test]
    fn test_snapshot_ancestors_of_files_are_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("x").join("y").join("z")).unwrap();
        fs::write(root.join("x").join("y").join("z").join("f.txt"), "v").unwrap();

        let snapshot = TreeSnapshot::take(root).unwrap();
        for file in snapshot.files.keys() {
            let mut ancestor = file.parent();
            while let Some(dir) = ancestor {
                assert!(snapshot.dirs.contains(&dir), "missing ancestor {}", dir);
                ancestor = dir.parent();
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_snapshot_skips_unreadable_directories() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("readable.txt"), "ok").unwrap();
        fs::create_dir(root.join("locked")).unwrap();
        fs::write(root.join("locked").join("hidden.txt"), "blocked").unwrap();
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged test runners bypass mode bits; only assert the skip
        // when the permission denial is actually in effect
        let denial_in_effect = fs::read_dir(root.join("locked")).is_err();
        let result = TreeSnapshot::take(root);

        // Restore before asserting so the tempdir can be cleaned up
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

        let snapshot = result.unwrap();
        assert!(snapshot.files.keys().any(|r| r.as_str() == "readable.txt"));
        assert!(snapshot.dirs.iter().any(|r| r.as_str() == "locked"));
        if denial_in_effect {
            assert!(!snapshot
                .files
                .keys()
                .any(|r| r.as_str() == "locked/hidden.txt"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_snapshot_skips_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let snapshot = TreeSnapshot::take(root).unwrap();
        assert_eq!(snapshot.files.len(), 1);
        assert!(snapshot.files.keys().any(|r| r.as_str() == "real.txt"));
    }
}
