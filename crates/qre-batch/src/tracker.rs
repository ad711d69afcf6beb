use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use qre_core::{ErrorInfo, QreError};

/// Durable, file-backed set of completed `(molecule_id, spec_hash)` tasks.
///
/// Each key owns an independent marker file, so concurrent marking needs no
/// cross-key locking and a crash can never corrupt unrelated entries.
/// Markers are created exactly once per successfully persisted result and
/// are never deleted by this engine.
#[derive(Debug, Clone)]
pub struct DoneTracker {
    root: PathBuf,
}

impl DoneTracker {
    /// Opens a tracker rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, QreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            QreError::Storage(
                ErrorInfo::new("tracker-mkdir", "failed to create done-marker directory")
                    .with_context("path", root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Ok(Self { root })
    }

    /// Marker file path for a task key.
    pub fn marker_path(&self, molecule_id: &str, spec_hash: &str) -> PathBuf {
        self.root.join(format!("{molecule_id}-{spec_hash}.done"))
    }

    /// Whether the task has already been completed, across process restarts.
    pub fn is_done(&self, molecule_id: &str, spec_hash: &str) -> bool {
        self.marker_path(molecule_id, spec_hash).exists()
    }

    /// Records task completion. Idempotent: re-marking an existing key is a
    /// no-op, and the open never truncates an existing marker.
    pub fn mark_done(&self, molecule_id: &str, spec_hash: &str) -> Result<(), QreError> {
        let path = self.marker_path(molecule_id, spec_hash);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                QreError::Storage(
                    ErrorInfo::new("tracker-mark", "failed to create done marker")
                        .with_context("path", path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        Ok(())
    }

    /// Number of markers currently present under the tracker root.
    pub fn count(&self) -> Result<usize, QreError> {
        let entries = fs::read_dir(&self.root).map_err(|err| {
            QreError::Storage(
                ErrorInfo::new("tracker-scan", "failed to scan done-marker directory")
                    .with_context("path", self.root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|err| {
                QreError::Storage(
                    ErrorInfo::new("tracker-scan-entry", "failed to read marker entry")
                        .with_hint(err.to_string()),
                )
            })?;
            if entry.path().extension().and_then(|ext| ext.to_str()) == Some("done") {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Root directory holding the markers.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mark_is_idempotent_and_durable() {
        let dir = TempDir::new().unwrap();
        let tracker = DoneTracker::new(dir.path().join("done")).unwrap();
        assert!(!tracker.is_done("H2", "abcd1234abcd1234"));

        tracker.mark_done("H2", "abcd1234abcd1234").unwrap();
        tracker.mark_done("H2", "abcd1234abcd1234").unwrap();
        assert!(tracker.is_done("H2", "abcd1234abcd1234"));
        assert_eq!(tracker.count().unwrap(), 1);

        // A fresh tracker over the same root observes the persisted mark.
        let reopened = DoneTracker::new(dir.path().join("done")).unwrap();
        assert!(reopened.is_done("H2", "abcd1234abcd1234"));
    }

    #[test]
    fn keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let tracker = DoneTracker::new(dir.path().join("done")).unwrap();
        tracker.mark_done("H2", "aaaa").unwrap();
        assert!(!tracker.is_done("H2", "bbbb"));
        assert!(!tracker.is_done("H2O", "aaaa"));
        tracker.mark_done("H2O", "aaaa").unwrap();
        assert_eq!(tracker.count().unwrap(), 2);
    }
}
