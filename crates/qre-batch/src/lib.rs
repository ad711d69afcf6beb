//! Resumable batch orchestration for QRE sweeps.
//!
//! The core loop expands to `(molecule, spec)` tasks, consults durable done
//! markers, runs the external estimation contract on a bounded worker pool,
//! appends one row per completed task to an append-only CSV table and only
//! then marks the task done. A crash between append and mark is re-run on
//! resume; the duplicate row is the accepted cost of at-least-once delivery.

#![deny(missing_docs)]

mod manifest;
mod row;
mod run;
mod sink;
mod tracker;

pub use manifest::RunManifest;
pub use row::ResultRow;
pub use run::{run_batch, BatchContext, BatchOptions, BatchReport, CancelFlag};
pub use sink::CsvSink;
pub use tracker::DoneTracker;
