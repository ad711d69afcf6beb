use serde::{Deserialize, Serialize};

use qre_core::{ErrorInfo, QreError};

/// Fermion-to-qubit encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// Jordan-Wigner.
    #[serde(rename = "JW")]
    Jw,
    /// Bravyi-Kitaev.
    #[serde(rename = "BK")]
    Bk,
}

impl Encoding {
    /// Wire name used in grids, hashes and result tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Jw => "JW",
            Encoding::Bk => "BK",
        }
    }
}

/// Hamiltonian decomposition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decomposition {
    /// Trotter product formula.
    Trotter,
    /// Qubitization / LCU.
    Qubitization,
}

impl Decomposition {
    /// Wire name used in grids, hashes and result tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decomposition::Trotter => "Trotter",
            Decomposition::Qubitization => "Qubitization",
        }
    }
}

/// Fault-tolerance layer parameters shared by every spec expanded from one grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultTolerance {
    /// Error-correction scheme identifier.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Physical qubit error rate, in (0, 1).
    #[serde(default = "default_physical_error_rate")]
    pub physical_error_rate: f64,
    /// Surface-code cycle time in nanoseconds.
    #[serde(default = "default_cycle_time_ns")]
    pub cycle_time_ns: u64,
    /// Maximum number of magic-state factories running in parallel.
    #[serde(default = "default_max_factories")]
    pub max_factories: u32,
}

fn default_scheme() -> String {
    "surface_code".to_string()
}

fn default_physical_error_rate() -> f64 {
    1e-4
}

fn default_cycle_time_ns() -> u64 {
    100
}

fn default_max_factories() -> u32 {
    4
}

impl Default for FaultTolerance {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            physical_error_rate: default_physical_error_rate(),
            cycle_time_ns: default_cycle_time_ns(),
            max_factories: default_max_factories(),
        }
    }
}

impl FaultTolerance {
    /// Validates the physical parameter ranges.
    pub fn validate(&self) -> Result<(), QreError> {
        if !(self.physical_error_rate > 0.0 && self.physical_error_rate < 1.0) {
            return Err(QreError::Config(
                ErrorInfo::new(
                    "ft-error-rate",
                    "physical_error_rate must lie strictly between 0 and 1",
                )
                .with_context("physical_error_rate", self.physical_error_rate.to_string()),
            ));
        }
        if self.cycle_time_ns == 0 {
            return Err(QreError::Config(ErrorInfo::new(
                "ft-cycle-time",
                "cycle_time_ns must be positive",
            )));
        }
        if self.max_factories == 0 {
            return Err(QreError::Config(ErrorInfo::new(
                "ft-factories",
                "max_factories must be positive",
            )));
        }
        Ok(())
    }
}

/// One fully-resolved point in the sweep: every field is a scalar leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoSpec {
    /// Basis set identifier (e.g. `STO-3G`).
    pub basis: String,
    /// Active space selection (e.g. `full`).
    pub active_space: String,
    /// Fermion-to-qubit encoding.
    pub encoding: Encoding,
    /// Hamiltonian decomposition strategy.
    pub decomposition: Decomposition,
    /// Target chemical accuracy in milli-Hartree, > 0.
    #[serde(rename = "target_error_mHa")]
    pub target_error_mha: f64,
    /// Fault-tolerance layer parameters.
    pub fault_tolerance: FaultTolerance,
}

impl AlgoSpec {
    /// Validates scalar ranges on the spec and its fault-tolerance record.
    pub fn validate(&self) -> Result<(), QreError> {
        if !(self.target_error_mha > 0.0) {
            return Err(QreError::Config(
                ErrorInfo::new("spec-target-error", "target_error_mHa must be positive")
                    .with_context("target_error_mHa", self.target_error_mha.to_string()),
            ));
        }
        self.fault_tolerance.validate()
    }

    /// Compact human-readable label used in diagnostics.
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}mHa",
            self.basis,
            self.active_space,
            self.encoding.as_str(),
            self.decomposition.as_str(),
            self.target_error_mha
        )
    }
}
