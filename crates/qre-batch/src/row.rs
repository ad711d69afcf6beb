use serde::{Deserialize, Serialize};

use qre_est::{LogicalEstimate, PhysicalEstimate};
use qre_spec::AlgoSpec;

/// Flattened output record for one completed task.
///
/// Column order is fixed: molecule identity, flattened spec fields, logical
/// resource fields, physical resource fields. Every row written to a given
/// destination carries exactly this column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Molecule identifier.
    pub molecule_id: String,
    /// Basis set.
    pub basis: String,
    /// Active space selection.
    pub active_space: String,
    /// Fermion-to-qubit encoding wire name.
    pub encoding: String,
    /// Decomposition strategy wire name.
    pub decomposition: String,
    /// Target chemical accuracy in milli-Hartree.
    pub target_error_mha: f64,
    /// Physical error rate of the fault-tolerance layer.
    pub phys_error_rate: f64,
    /// Logical qubit count.
    pub logical_qubits: u64,
    /// T-gate count.
    pub t_count: f64,
    /// Logical circuit depth.
    pub circuit_depth: f64,
    /// Estimated logical runtime in seconds.
    pub est_runtime_sec: f64,
    /// Physical qubit count.
    pub physical_qubits: u64,
    /// Estimated physical runtime in seconds.
    pub physical_runtime_sec: f64,
}

impl ResultRow {
    /// Header column names, in the order values are emitted.
    pub const COLUMNS: [&'static str; 13] = [
        "molecule_id",
        "basis",
        "active_space",
        "encoding",
        "decomposition",
        "target_error_mHa",
        "phys_error_rate",
        "logical_qubits",
        "t_count",
        "circuit_depth",
        "est_runtime_sec",
        "physical_qubits",
        "physical_runtime_sec",
    ];

    /// Builds a row from a task's spec and its estimation outputs.
    pub fn from_parts(
        molecule_id: &str,
        spec: &AlgoSpec,
        logical: &LogicalEstimate,
        physical: &PhysicalEstimate,
    ) -> Self {
        Self {
            molecule_id: molecule_id.to_string(),
            basis: spec.basis.clone(),
            active_space: spec.active_space.clone(),
            encoding: spec.encoding.as_str().to_string(),
            decomposition: spec.decomposition.as_str().to_string(),
            target_error_mha: spec.target_error_mha,
            phys_error_rate: spec.fault_tolerance.physical_error_rate,
            logical_qubits: logical.logical_qubits,
            t_count: logical.t_count,
            circuit_depth: logical.circuit_depth,
            est_runtime_sec: logical.est_runtime_sec,
            physical_qubits: physical.physical_qubits,
            physical_runtime_sec: physical.physical_runtime_sec,
        }
    }

    /// Values rendered for CSV output, aligned with [`Self::COLUMNS`].
    pub fn values(&self) -> Vec<String> {
        vec![
            self.molecule_id.clone(),
            self.basis.clone(),
            self.active_space.clone(),
            self.encoding.clone(),
            self.decomposition.clone(),
            self.target_error_mha.to_string(),
            self.phys_error_rate.to_string(),
            self.logical_qubits.to_string(),
            format!("{:.3}", self.t_count),
            format!("{:.3}", self.circuit_depth),
            format!("{:.3}", self.est_runtime_sec),
            self.physical_qubits.to_string(),
            format!("{:.6}", self.physical_runtime_sec),
        ]
    }
}
