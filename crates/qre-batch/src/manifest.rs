use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use qre_core::{ErrorInfo, QreError};

use crate::run::BatchReport;

/// Structured manifest describing one batch invocation, persisted beside the
/// result table for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Stable content hash of the grid configuration the run expanded.
    pub grid_hash: String,
    /// Number of molecules supplied to the run.
    pub molecules: usize,
    /// Number of specs expanded from the grid.
    pub specs: usize,
    /// Tasks completed in this invocation (rows appended).
    pub completed: usize,
    /// Tasks skipped because their done marker already existed.
    pub skipped: usize,
    /// Tasks whose external computation failed or timed out.
    pub failed: usize,
    /// ISO-8601 timestamp of manifest creation.
    pub created_at: String,
}

impl RunManifest {
    /// Builds a manifest from a finished batch report.
    pub fn from_report(grid_hash: String, molecules: usize, specs: usize, report: &BatchReport) -> Self {
        Self {
            grid_hash,
            molecules,
            specs,
            completed: report.completed,
            skipped: report.skipped,
            failed: report.failed,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Writes the manifest to a JSON file, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), QreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                QreError::Storage(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            QreError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            QreError::Storage(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, QreError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            QreError::Storage(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            QreError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run").join("manifest.json");
        let manifest = RunManifest {
            grid_hash: "deadbeefdeadbeef".to_string(),
            molecules: 3,
            specs: 4,
            completed: 8,
            skipped: 0,
            failed: 0,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        manifest.write(&path).unwrap();
        let loaded = RunManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }
}
