//! Pass orchestration: snapshot both trees, plan, execute, aggregate
//!
//! One pass is stateless and idempotent: snapshots are rebuilt from scratch,
//! so a repeated pass over an unchanged source yields an empty plan. The
//! caller (a fixed-interval scheduler) invokes `run_once` forever; a pass
//! that partially failed is reported, never escalated, because the next
//! scheduled pass is the retry mechanism.

use crate::error::SyncError;
use crate::execute::{apply, Outcome};
use crate::plan::plan;
use crate::snapshot::TreeSnapshot;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Aggregate result of one snapshot → plan → execute pass
#[derive(Debug, Clone)]
pub struct PassResult {
    /// One record per applied action, in plan order
    pub outcomes: Vec<Outcome>,
    /// Wall-clock completion time of the pass
    pub completed_at: DateTime<Utc>,
    /// Total pass duration, hashing included
    pub duration: Duration,
}

impl PassResult {
    /// Number of actions that succeeded
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    /// Number of actions that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when the pass had nothing to do
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Error view for callers that want a `Result` per pass
    pub fn as_result(&self) -> Result<(), SyncError> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(SyncError::PartialPass {
                failed,
                total: self.outcomes.len(),
            }),
        }
    }
}

/// Run one reconciliation pass converging `replica_root` toward `source_root`.
///
/// The source root must exist; the replica root is created if absent
/// (first-ever sync bootstrap). Per-action failures are captured in the
/// returned outcomes, not raised.
#[instrument(skip_all, fields(source = %source_root.display(), replica = %replica_root.display()))]
pub fn run_once(source_root: &Path, replica_root: &Path) -> Result<PassResult, SyncError> {
    let start = Instant::now();

    if !source_root.is_dir() {
        return Err(SyncError::SourceMissing(source_root.to_path_buf()));
    }
    fs::create_dir_all(replica_root)?;

    let source = snapshot_source(source_root)?;
    let replica = TreeSnapshot::take(replica_root)?;

    let actions = plan(&source, &replica);
    let outcomes: Vec<Outcome> = actions
        .iter()
        .map(|action| apply(action, source_root, replica_root))
        .collect();

    let result = PassResult {
        outcomes,
        completed_at: Utc::now(),
        duration: start.elapsed(),
    };

    info!(
        actions = result.outcomes.len(),
        failed = result.failed(),
        duration_ms = result.duration.as_millis(),
        "Pass complete"
    );

    Ok(result)
}

/// Snapshot the source tree, classifying a vanished root as the fatal
/// source-missing condition. The upfront existence check does not cover a
/// source removed between that check and the walk.
fn snapshot_source(root: &Path) -> Result<TreeSnapshot, SyncError> {
    TreeSnapshot::take(root).map_err(|e| match e {
        SyncError::RootNotFound(path) => SyncError::SourceMissing(path),
        other => other,
    })
}
