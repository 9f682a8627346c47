//! Diff planning between source and replica snapshots

use crate::relpath::RelPath;
use crate::snapshot::TreeSnapshot;
use std::fmt;
use tracing::debug;

/// One filesystem operation to converge the replica toward the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy a source file absent from the replica
    CopyFile(RelPath),
    /// Replace a replica file whose content drifted from the source
    UpdateFile(RelPath),
    /// Remove a replica file absent from the source
    DeleteFile(RelPath),
    /// Create a source directory absent from the replica
    CreateDir(RelPath),
    /// Remove a replica directory absent from the source
    DeleteDir(RelPath),
}

impl Action {
    /// The relative path this action targets
    pub fn path(&self) -> &RelPath {
        match self {
            Action::CopyFile(rel)
            | Action::UpdateFile(rel)
            | Action::DeleteFile(rel)
            | Action::CreateDir(rel)
            | Action::DeleteDir(rel) => rel,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CopyFile(rel) => write!(f, "copy {}", rel),
            Action::UpdateFile(rel) => write!(f, "update {}", rel),
            Action::DeleteFile(rel) => write!(f, "delete {}", rel),
            Action::CreateDir(rel) => write!(f, "mkdir {}", rel),
            Action::DeleteDir(rel) => write!(f, "rmdir {}", rel),
        }
    }
}

/// Compute the ordered action batch that converges `replica` toward `source`.
///
/// Batch order:
/// 1. file deletions (replica-only files)
/// 2. directory deletions, deepest first (children before parents)
/// 3. directory creations, shallowest first (parents before children)
/// 4. file copies (source-only files)
/// 5. file updates (shared paths whose fingerprints differ)
///
/// Deletions precede creations so a path whose kind flipped between file and
/// directory is always handled as delete-then-create, never in place. Every
/// `CreateDir` precedes any copy or update into that directory, and every
/// `DeleteDir` follows the deletion of everything nested inside it.
pub fn plan(source: &TreeSnapshot, replica: &TreeSnapshot) -> Vec<Action> {
    let mut actions = Vec::new();

    // 1. Replica files with no source counterpart
    for rel in replica.files.keys() {
        if !source.files.contains_key(rel) {
            actions.push(Action::DeleteFile(rel.clone()));
        }
    }

    // 2. Replica directories with no source counterpart, deepest first
    let mut dir_deletes: Vec<&RelPath> = replica
        .dirs
        .iter()
        .filter(|rel| !source.dirs.contains(*rel))
        .collect();
    dir_deletes.sort_by(|a, b| b.depth().cmp(&a.depth()).then_with(|| a.cmp(b)));
    actions.extend(dir_deletes.into_iter().map(|rel| Action::DeleteDir(rel.clone())));

    // 3. Source directories missing from the replica, shallowest first
    let mut dir_creates: Vec<&RelPath> = source
        .dirs
        .iter()
        .filter(|rel| !replica.dirs.contains(*rel))
        .collect();
    dir_creates.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.cmp(b)));
    actions.extend(dir_creates.into_iter().map(|rel| Action::CreateDir(rel.clone())));

    // 4. Source files missing from the replica
    for rel in source.files.keys() {
        if !replica.files.contains_key(rel) {
            actions.push(Action::CopyFile(rel.clone()));
        }
    }

    // 5. Shared files whose content drifted
    for (rel, source_fp) in &source.files {
        if let Some(replica_fp) = replica.files.get(rel) {
            if source_fp != replica_fp {
                actions.push(Action::UpdateFile(rel.clone()));
            }
        }
    }

    debug!(action_count = actions.len(), "Plan computed");
    actions
}
