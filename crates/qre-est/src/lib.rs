//! Resource estimation contract for the QRE sweep engine.
//!
//! The estimation itself is an external collaborator with a fixed contract:
//! the orchestrator only depends on the [`ResourceEstimator`] trait and the
//! [`logical_to_physical`] cost conversion. The bundled
//! [`HeuristicEstimator`] is a deterministic stand-in for a real quantum
//! chemistry backend.

#![deny(missing_docs)]

mod cost;
mod heuristic;

use std::path::Path;

use serde::{Deserialize, Serialize};

use qre_core::QreError;
use qre_spec::AlgoSpec;

pub use cost::logical_to_physical;
pub use heuristic::HeuristicEstimator;

/// Logical resource estimate for one (molecule, spec) task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalEstimate {
    /// Number of logical qubits required by the circuit.
    pub logical_qubits: u64,
    /// Total T-gate count.
    pub t_count: f64,
    /// Logical circuit depth.
    pub circuit_depth: f64,
    /// Estimated logical runtime in seconds.
    pub est_runtime_sec: f64,
}

/// Physical resource estimate derived from a logical estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalEstimate {
    /// Number of physical qubits after error-correction overhead.
    pub physical_qubits: u64,
    /// Estimated wall-clock runtime in seconds.
    pub physical_runtime_sec: f64,
}

/// Seam for the expensive, potentially-failing external computation.
///
/// Implementations must be deterministic for a given `(artifact, spec)` pair
/// and report per-task failures as [`QreError::Compute`] values rather than
/// panicking; the orchestrator treats those as recoverable.
pub trait ResourceEstimator: Send + Sync {
    /// Estimates logical resources for one molecule artifact under one spec.
    fn estimate(&self, artifact: &Path, spec: &AlgoSpec) -> Result<LogicalEstimate, QreError>;
}
