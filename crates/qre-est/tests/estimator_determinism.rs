use std::fs;

use qre_est::{HeuristicEstimator, ResourceEstimator};
use qre_spec::{AlgoSpec, Decomposition, Encoding, FaultTolerance};
use tempfile::TempDir;

fn sample_spec(encoding: Encoding) -> AlgoSpec {
    AlgoSpec {
        basis: "STO-3G".to_string(),
        active_space: "full".to_string(),
        encoding,
        decomposition: Decomposition::Trotter,
        target_error_mha: 1.6,
        fault_tolerance: FaultTolerance::default(),
    }
}

#[test]
fn repeated_estimates_match_exactly() {
    let dir = TempDir::new().expect("tempdir");
    let artifact = dir.path().join("H2.yaml");
    fs::write(&artifact, "document:\n  molecule: H2\n").expect("write artifact");

    let estimator = HeuristicEstimator::new();
    let spec = sample_spec(Encoding::Jw);
    let a = estimator.estimate(&artifact, &spec).expect("estimate");
    let b = estimator.estimate(&artifact, &spec).expect("estimate");
    assert_eq!(a, b);
    assert!(a.logical_qubits >= 50);
    assert!(a.t_count >= 1e9);
}

#[test]
fn distinct_specs_produce_distinct_estimates() {
    let dir = TempDir::new().expect("tempdir");
    let artifact = dir.path().join("H2O.yaml");
    fs::write(&artifact, "document:\n  molecule: H2O\n").expect("write artifact");

    let estimator = HeuristicEstimator::new();
    let jw = estimator
        .estimate(&artifact, &sample_spec(Encoding::Jw))
        .expect("estimate");
    let bk = estimator
        .estimate(&artifact, &sample_spec(Encoding::Bk))
        .expect("estimate");
    assert_ne!(jw, bk);
}

#[test]
fn missing_artifact_is_a_compute_error() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.yaml");
    let err = HeuristicEstimator::new()
        .estimate(&missing, &sample_spec(Encoding::Jw))
        .expect_err("missing artifact");
    assert!(matches!(err, qre_core::QreError::Compute(_)));
    assert!(!err.is_fatal());
}

#[test]
fn empty_artifact_is_a_compute_error() {
    let dir = TempDir::new().expect("tempdir");
    let artifact = dir.path().join("empty.yaml");
    fs::write(&artifact, "  \n").expect("write artifact");
    let err = HeuristicEstimator::new()
        .estimate(&artifact, &sample_spec(Encoding::Jw))
        .expect_err("empty artifact");
    assert!(matches!(err, qre_core::QreError::Compute(_)));
}
