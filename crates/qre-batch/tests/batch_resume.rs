use std::fs;
use std::path::Path;
use std::sync::Arc;

use qre_batch::{run_batch, BatchContext, BatchOptions, CancelFlag, CsvSink, DoneTracker};
use qre_chem::write_artifact_stub;
use qre_est::HeuristicEstimator;
use qre_spec::SweepGrid;
use tempfile::TempDir;

const SCENARIO_GRID: &str = r#"
basis: ["STO-3G", "6-31G"]
active_space: full
encoding: ["JW", "BK"]
decomposition: Trotter
target_error_mHa: [1.0]
"#;

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn scenario_run_then_idempotent_resume() {
    let dir = TempDir::new().expect("tempdir");
    let artifact_dir = dir.path().join("broombridge");
    // Three molecules, one without an artifact.
    write_artifact_stub(&artifact_dir, "H2").expect("stub");
    write_artifact_stub(&artifact_dir, "H2O").expect("stub");
    let molecules = vec!["H2".to_string(), "H2O".to_string(), "CH4".to_string()];

    let specs = SweepGrid::from_yaml(SCENARIO_GRID)
        .expect("grid")
        .expand()
        .expect("expand");
    assert_eq!(specs.len(), 4);

    let out_csv = dir.path().join("data").join("resource_estimates.csv");
    let tracker = DoneTracker::new(dir.path().join("done")).expect("tracker");

    let first = {
        let sink = CsvSink::new(&out_csv);
        let ctx = BatchContext {
            artifact_dir: &artifact_dir,
            sink: &sink,
            tracker: &tracker,
            estimator: Arc::new(HeuristicEstimator::new()),
            options: BatchOptions {
                resume: false,
                workers: 2,
                task_timeout: None,
            },
            cancel: CancelFlag::new(),
        };
        run_batch(&molecules, &specs, &ctx).expect("first run")
    };

    // 2 molecules with artifacts x 4 specs.
    assert_eq!(first.total, 8);
    assert_eq!(first.rows.len(), 8);
    assert_eq!(first.completed, 8);
    assert_eq!(first.failed, 0);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.missing_artifacts, 1);
    assert_eq!(tracker.count().expect("count"), 8);
    // One header line followed by eight data lines.
    assert_eq!(line_count(&out_csv), 9);
    assert!(fs::read_to_string(&out_csv)
        .unwrap()
        .starts_with("molecule_id,basis,active_space,encoding,decomposition,target_error_mHa"));
    // Rows come back in enumeration order: all H2 rows before H2O rows.
    assert!(first.rows[..4].iter().all(|row| row.molecule_id == "H2"));
    assert!(first.rows[4..].iter().all(|row| row.molecule_id == "H2O"));

    // Fresh sink simulates a new process lifetime over the same destination.
    let second = {
        let sink = CsvSink::new(&out_csv);
        let ctx = BatchContext {
            artifact_dir: &artifact_dir,
            sink: &sink,
            tracker: &tracker,
            estimator: Arc::new(HeuristicEstimator::new()),
            options: BatchOptions {
                resume: true,
                workers: 2,
                task_timeout: None,
            },
            cancel: CancelFlag::new(),
        };
        run_batch(&molecules, &specs, &ctx).expect("resumed run")
    };

    assert_eq!(second.rows.len(), 0);
    assert_eq!(second.completed, 0);
    assert_eq!(second.skipped, 8);
    assert_eq!(tracker.count().expect("count"), 8);
    assert_eq!(line_count(&out_csv), 9);
}

#[test]
fn resume_disabled_reruns_every_task() {
    let dir = TempDir::new().expect("tempdir");
    let artifact_dir = dir.path().join("broombridge");
    write_artifact_stub(&artifact_dir, "H2").expect("stub");
    let molecules = vec!["H2".to_string()];
    let specs = SweepGrid::from_yaml(SCENARIO_GRID)
        .expect("grid")
        .expand()
        .expect("expand");

    let out_csv = dir.path().join("results.csv");
    let tracker = DoneTracker::new(dir.path().join("done")).expect("tracker");
    for _ in 0..2 {
        let sink = CsvSink::new(&out_csv);
        let ctx = BatchContext {
            artifact_dir: &artifact_dir,
            sink: &sink,
            tracker: &tracker,
            estimator: Arc::new(HeuristicEstimator::new()),
            options: BatchOptions {
                resume: false,
                workers: 1,
                task_timeout: None,
            },
            cancel: CancelFlag::new(),
        };
        let report = run_batch(&molecules, &specs, &ctx).expect("run");
        assert_eq!(report.completed, 4);
    }
    // Markers stay deduplicated while the table accrues both passes.
    assert_eq!(tracker.count().expect("count"), 4);
    assert_eq!(line_count(&out_csv), 9);
}

#[test]
fn pre_raised_cancel_flag_runs_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let artifact_dir = dir.path().join("broombridge");
    write_artifact_stub(&artifact_dir, "H2").expect("stub");
    let molecules = vec!["H2".to_string()];
    let specs = SweepGrid::from_yaml(SCENARIO_GRID)
        .expect("grid")
        .expand()
        .expect("expand");

    let sink = CsvSink::new(dir.path().join("results.csv"));
    let tracker = DoneTracker::new(dir.path().join("done")).expect("tracker");
    let cancel = CancelFlag::new();
    cancel.cancel();
    let ctx = BatchContext {
        artifact_dir: &artifact_dir,
        sink: &sink,
        tracker: &tracker,
        estimator: Arc::new(HeuristicEstimator::new()),
        options: BatchOptions {
            resume: false,
            workers: 2,
            task_timeout: None,
        },
        cancel,
    };
    let report = run_batch(&molecules, &specs, &ctx).expect("run");
    assert_eq!(report.completed, 0);
    assert_eq!(tracker.count().expect("count"), 0);
}
