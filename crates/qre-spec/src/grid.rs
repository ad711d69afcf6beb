use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use qre_core::{ErrorInfo, QreError};

use crate::model::{AlgoSpec, Decomposition, Encoding, FaultTolerance};

/// A grid axis holding either a single candidate or an ordered candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single candidate value.
    One(T),
    /// An ordered list of candidate values.
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    fn candidates(&self, axis: &str) -> Result<Vec<T>, QreError> {
        match self {
            OneOrMany::One(value) => Ok(vec![value.clone()]),
            OneOrMany::Many(values) if values.is_empty() => Err(QreError::Config(
                ErrorInfo::new("grid-empty-axis", "grid axis has an empty candidate list")
                    .with_context("axis", axis),
            )),
            OneOrMany::Many(values) => Ok(values.clone()),
        }
    }
}

fn default_phys_error_rate_axis() -> OneOrMany<f64> {
    OneOrMany::One(1e-4)
}

fn default_cycle_time_ns() -> u64 {
    100
}

fn default_max_factories() -> u32 {
    4
}

/// Declarative sweep definition mapping parameter names to candidate sets.
///
/// Loaded once per batch invocation and read-only afterwards. Every required
/// axis accepts a scalar or a list; `phys_error_rate` participates in the
/// Cartesian product while `cycle_time_ns` and `max_factories` are shared
/// scalars applied uniformly to every expanded spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Basis set candidates.
    pub basis: OneOrMany<String>,
    /// Active space candidates.
    pub active_space: OneOrMany<String>,
    /// Encoding candidates.
    pub encoding: OneOrMany<Encoding>,
    /// Decomposition candidates.
    pub decomposition: OneOrMany<Decomposition>,
    /// Target chemical accuracy candidates, in milli-Hartree.
    #[serde(rename = "target_error_mHa")]
    pub target_error_mha: OneOrMany<f64>,
    /// Physical error rate candidates for the fault-tolerance layer.
    #[serde(default = "default_phys_error_rate_axis")]
    pub phys_error_rate: OneOrMany<f64>,
    /// Surface-code cycle time shared by every expanded spec.
    #[serde(default = "default_cycle_time_ns")]
    pub cycle_time_ns: u64,
    /// Factory cap shared by every expanded spec.
    #[serde(default = "default_max_factories")]
    pub max_factories: u32,
}

impl SweepGrid {
    /// Loads a grid from a YAML document on disk.
    pub fn load(path: &Path) -> Result<Self, QreError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            QreError::Config(
                ErrorInfo::new("grid-read", "failed to read grid configuration")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Self::from_yaml(&contents)
    }

    /// Parses a grid from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, QreError> {
        serde_yaml::from_str(contents).map_err(|err| {
            QreError::Config(
                ErrorInfo::new("grid-parse", "malformed grid configuration")
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Expands the grid into the full Cartesian product of concrete specs.
    ///
    /// Axis order is fixed as `basis, active_space, encoding, decomposition,
    /// target_error_mHa, phys_error_rate` with the rightmost axis varying
    /// fastest, so iteration order is reproducible across runs and processes.
    pub fn expand(&self) -> Result<Vec<AlgoSpec>, QreError> {
        let bases = self.basis.candidates("basis")?;
        let active_spaces = self.active_space.candidates("active_space")?;
        let encodings = self.encoding.candidates("encoding")?;
        let decompositions = self.decomposition.candidates("decomposition")?;
        let target_errors = self.target_error_mha.candidates("target_error_mHa")?;
        let error_rates = self.phys_error_rate.candidates("phys_error_rate")?;

        let capacity = bases.len()
            * active_spaces.len()
            * encodings.len()
            * decompositions.len()
            * target_errors.len()
            * error_rates.len();
        let mut specs = Vec::with_capacity(capacity);
        for basis in &bases {
            for active_space in &active_spaces {
                for encoding in &encodings {
                    for decomposition in &decompositions {
                        for target_error in &target_errors {
                            for error_rate in &error_rates {
                                let spec = AlgoSpec {
                                    basis: basis.clone(),
                                    active_space: active_space.clone(),
                                    encoding: *encoding,
                                    decomposition: *decomposition,
                                    target_error_mha: *target_error,
                                    fault_tolerance: FaultTolerance {
                                        scheme: "surface_code".to_string(),
                                        physical_error_rate: *error_rate,
                                        cycle_time_ns: self.cycle_time_ns,
                                        max_factories: self.max_factories,
                                    },
                                };
                                spec.validate()?;
                                specs.push(spec);
                            }
                        }
                    }
                }
            }
        }
        Ok(specs)
    }
}
