//! Algorithm specification model and deterministic sweep grid expansion.

#![deny(missing_docs)]

mod grid;
mod hash;
mod model;

pub use grid::{OneOrMany, SweepGrid};
pub use hash::spec_hash;
pub use model::{AlgoSpec, Decomposition, Encoding, FaultTolerance};
