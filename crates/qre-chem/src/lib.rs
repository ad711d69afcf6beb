//! Chemistry front-end glue: molecule lists and Broombridge artifacts.
//!
//! Real electronic-structure preprocessing (PySCF/NWChem style) is an
//! external collaborator; this crate only fixes the file layout the batch
//! engine consumes and provides stub artifacts for smoke runs.

#![deny(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use qre_core::{ErrorInfo, QreError};

/// File extension used for per-molecule Broombridge artifacts.
pub const ARTIFACT_EXT: &str = "yaml";

/// Reads a molecule list: one identifier per line, first whitespace token,
/// blank lines and lines starting with `#` ignored.
pub fn read_molecule_list(path: &Path) -> Result<Vec<String>, QreError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        QreError::Config(
            ErrorInfo::new("molecule-list-read", "failed to read molecule list")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let molecules: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect();
    if molecules.is_empty() {
        return Err(QreError::Config(
            ErrorInfo::new("molecule-list-empty", "molecule list contains no identifiers")
                .with_context("path", path.display().to_string()),
        ));
    }
    Ok(molecules)
}

/// Returns the artifact path for a molecule: `{dir}/{molecule_id}.yaml`.
pub fn artifact_path(dir: &Path, molecule_id: &str) -> PathBuf {
    dir.join(format!("{molecule_id}.{ARTIFACT_EXT}"))
}

/// Writes a stub Broombridge document for the given molecule.
///
/// Placeholder integrals only; a production deployment replaces these files
/// with real electronic-structure output under the same path layout.
pub fn write_artifact_stub(dir: &Path, molecule_id: &str) -> Result<PathBuf, QreError> {
    fs::create_dir_all(dir).map_err(|err| {
        QreError::Storage(
            ErrorInfo::new("artifact-mkdir", "failed to create artifact directory")
                .with_context("path", dir.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let path = artifact_path(dir, molecule_id);
    let contents = format!(
        r#"# Broombridge stub for {molecule_id}
document:
  molecule: {molecule_id}
  basis_set: STO-3G
  geometry:
    units: angstrom
    atoms:
      - H: [0.0, 0.0, 0.0]
  hamiltonian:
    name: electronic
    one_electron_integrals:
      - [0.0, 0.0]
    two_electron_integrals:
      - [0.0, 0.0, 0.0, 0.0]
"#
    );
    fs::write(&path, contents).map_err(|err| {
        QreError::Storage(
            ErrorInfo::new("artifact-write", "failed to write artifact stub")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    Ok(path)
}
