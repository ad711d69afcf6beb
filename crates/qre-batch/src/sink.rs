use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use csv::WriterBuilder;

use qre_core::{ErrorInfo, QreError};

/// Append-only CSV result sink.
///
/// The destination is opened in append mode per call and never held open
/// across calls, so an interrupted run always leaves a valid, readable
/// partial table. The header decision is made exactly once per process
/// behind the internal lock: it is written only on the first append and only
/// when the destination file does not already exist, which keeps resumed
/// runs from duplicating it. The same lock serializes concurrent appends
/// from worker threads.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    header: Mutex<Option<Vec<String>>>,
}

impl CsvSink {
    /// Creates a sink targeting `path`. Nothing is written until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header: Mutex::new(None),
        }
    }

    /// Destination path of the sink.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, establishing the header from the first row's columns.
    ///
    /// Passing a column set that differs from the established header fails
    /// with [`QreError::Schema`]; callers own column stability for a sweep.
    pub fn append(&self, columns: &[&str], values: &[String]) -> Result<(), QreError> {
        if columns.len() != values.len() {
            return Err(QreError::Schema(
                ErrorInfo::new("sink-arity", "row value count differs from column count")
                    .with_context("columns", columns.len().to_string())
                    .with_context("values", values.len().to_string()),
            ));
        }

        let mut header = match self.header.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let write_header = match header.as_ref() {
            Some(established) => {
                if established != columns {
                    return Err(QreError::Schema(
                        ErrorInfo::new(
                            "sink-schema-mismatch",
                            "row columns disagree with the established header",
                        )
                        .with_context("expected", established.join(","))
                        .with_context("got", columns.join(",")),
                    ));
                }
                false
            }
            None => !self.path.exists(),
        };

        self.ensure_parent()?;
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| {
                QreError::Storage(
                    ErrorInfo::new("sink-open", "failed to open result table")
                        .with_context("path", self.path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        if write_header {
            writer
                .write_record(columns)
                .map_err(|err| wrap_csv("sink-write-header", err))?;
        }
        writer
            .write_record(values)
            .map_err(|err| wrap_csv("sink-write-row", err))?;
        writer
            .flush()
            .map_err(|err| wrap_csv("sink-flush", err.into()))?;

        if header.is_none() {
            *header = Some(columns.iter().map(|c| c.to_string()).collect());
        }
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), QreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    QreError::Storage(
                        ErrorInfo::new("sink-mkdir", "failed to create result table directory")
                            .with_context("path", parent.display().to_string())
                            .with_hint(err.to_string()),
                    )
                })?;
            }
        }
        Ok(())
    }
}

fn wrap_csv(code: &str, err: csv::Error) -> QreError {
    QreError::Storage(ErrorInfo::new(code, "CSV sink failure").with_hint(err.to_string()))
}
