//! Foldsync: one-way periodic directory tree synchronization
//!
//! Converges a replica directory tree toward a source tree one pass at a
//! time: snapshot both trees, plan the minimal ordered batch of
//! copy/update/delete/mkdir/rmdir actions, apply them with per-action
//! failure isolation. Passes are stateless and idempotent; a scheduler
//! invokes [`orchestrate::run_once`] at a fixed interval.

pub mod config;
pub mod error;
pub mod execute;
pub mod fingerprint;
pub mod logging;
pub mod orchestrate;
pub mod plan;
pub mod relpath;
pub mod snapshot;
