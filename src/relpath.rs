//! Relative-path identity keys for matching entries across trees

use crate::error::SyncError;
use std::fmt;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// A path relative to a tree root, used as the identity key when matching
/// entries between the source and replica trees.
///
/// Stored as a `/`-separated, NFC-normalized string so that the same logical
/// entry compares equal regardless of which tree (or platform separator) it
/// was observed under. Ordering is lexicographic over the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath(String);

impl RelPath {
    /// Build a RelPath from an absolute entry path and the tree root it
    /// belongs to.
    ///
    /// Fails if `path` is not located under `root` or contains components
    /// that cannot be expressed relative to it.
    pub fn from_root(root: &Path, path: &Path) -> Result<Self, SyncError> {
        let relative = path.strip_prefix(root).map_err(|_| {
            SyncError::InvalidPath(format!("{:?} is not under root {:?}", path, root))
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                std::path::Component::Normal(name) => {
                    // Lossy conversion could alias two distinct on-disk names
                    // to one key, so non-UTF-8 names are rejected outright
                    let name = name.to_str().ok_or_else(|| {
                        SyncError::InvalidPath(format!("Non-UTF-8 file name in {:?}", path))
                    })?;
                    // Normalize Unicode to NFC for stable cross-tree identity
                    segments.push(name.nfc().collect::<String>());
                }
                other => {
                    return Err(SyncError::InvalidPath(format!(
                        "Unexpected component {:?} in {:?}",
                        other, path
                    )));
                }
            }
        }

        if segments.is_empty() {
            return Err(SyncError::InvalidPath(format!(
                "{:?} resolves to the root itself",
                path
            )));
        }

        Ok(Self(segments.join("/")))
    }

    /// Parse a RelPath from a normalized `/`-separated string
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(SyncError::InvalidPath("empty relative path".to_string()));
        }
        if trimmed.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
            return Err(SyncError::InvalidPath(format!(
                "invalid relative path: {}",
                raw
            )));
        }
        Ok(Self(trimmed.nfc().collect()))
    }

    /// The normalized string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of path segments
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    /// Parent path, or None for a top-level entry
    pub fn parent(&self) -> Option<RelPath> {
        self.0.rfind('/').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Resolve this relative path into a concrete path under `root`
    pub fn resolve_under(&self, root: &Path) -> PathBuf {
        let mut resolved = root.to_path_buf();
        for segment in self.0.split('/') {
            resolved.push(segment);
        }
        resolved
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
