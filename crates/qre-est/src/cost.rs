use qre_spec::FaultTolerance;

use crate::{LogicalEstimate, PhysicalEstimate};

/// Error-rate threshold below which the lighter surface-code overhead applies.
const LOW_ERROR_THRESHOLD: f64 = 1e-4;

/// Converts a logical estimate into physical resources under a
/// fault-tolerance configuration.
///
/// Surface-code overhead is approximated with two regimes: at or below
/// `1e-4` physical error rate a distance-7 code costs roughly 100 physical
/// qubits per logical qubit with a `3e4` T-factory time divisor; above it
/// the overhead doubles.
pub fn logical_to_physical(logical: &LogicalEstimate, ft: &FaultTolerance) -> PhysicalEstimate {
    let (qubit_overhead, time_overhead) = if ft.physical_error_rate <= LOW_ERROR_THRESHOLD {
        (100u64, 3e4)
    } else {
        (200u64, 5e4)
    };
    PhysicalEstimate {
        physical_qubits: logical.logical_qubits * qubit_overhead,
        physical_runtime_sec: logical.t_count / time_overhead,
    }
}
