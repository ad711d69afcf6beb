use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;

use qre_core::{ErrorInfo, QreError};
use qre_est::{logical_to_physical, LogicalEstimate, ResourceEstimator};
use qre_spec::{spec_hash, AlgoSpec};

use crate::row::ResultRow;
use crate::sink::CsvSink;
use crate::tracker::DoneTracker;

/// Options controlling a batch invocation.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Skip tasks whose done marker already exists.
    pub resume: bool,
    /// Worker pool size for the external estimation calls.
    pub workers: usize,
    /// Optional per-task wall-clock limit on the estimation call. A timed
    /// out task counts as failed; its estimator thread may outlive the wait
    /// and its late result is discarded.
    pub task_timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            resume: true,
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            task_timeout: None,
        }
    }
}

/// Cooperative cancellation handle shared with the worker pool.
///
/// Once raised, workers finish their in-flight task and take no new ones;
/// nothing is ever marked done without its result row appended first.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, unraised flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the batch stop taking new tasks.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Collaborators and options for one batch invocation.
pub struct BatchContext<'a> {
    /// Directory holding per-molecule Broombridge artifacts.
    pub artifact_dir: &'a Path,
    /// Append-only result table.
    pub sink: &'a CsvSink,
    /// Durable completion tracker.
    pub tracker: &'a DoneTracker,
    /// External estimation contract.
    pub estimator: Arc<dyn ResourceEstimator>,
    /// Invocation options.
    pub options: BatchOptions,
    /// Cooperative cancellation handle.
    pub cancel: CancelFlag,
}

/// Outcome of one batch invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Rows produced by THIS invocation, in enumeration order. Tasks skipped
    /// on resume are not re-returned.
    pub rows: Vec<ResultRow>,
    /// Tasks completed in this invocation.
    pub completed: usize,
    /// Tasks skipped because their done marker already existed.
    pub skipped: usize,
    /// Tasks whose external computation failed or timed out.
    pub failed: usize,
    /// Molecules skipped entirely for lack of an input artifact.
    pub missing_artifacts: usize,
    /// Total task count over molecules that had an artifact.
    pub total: usize,
}

struct Task {
    index: usize,
    molecule_id: String,
    artifact: PathBuf,
    spec_index: usize,
    spec_hash: String,
}

/// Runs the sweep over every `(molecule, spec)` pair.
///
/// Enumeration order is the deterministic double loop molecule × spec, so
/// resumed-skip decisions and progress accounting are reproducible even
/// though completion order under the worker pool is not. Per task the
/// ordering is fixed: estimate, refine, append row, mark done. A single
/// task's computation failure never aborts the batch; storage and schema
/// failures are fatal and surface after in-flight tasks drain.
pub fn run_batch(
    molecules: &[String],
    specs: &[AlgoSpec],
    ctx: &BatchContext<'_>,
) -> Result<BatchReport, QreError> {
    let hashes: Vec<String> = specs.iter().map(spec_hash).collect::<Result<_, _>>()?;

    let mut pending = Vec::new();
    let mut skipped = 0usize;
    let mut missing_artifacts = 0usize;
    let mut processed_molecules = 0usize;
    let mut index = 0usize;
    for molecule_id in molecules {
        let artifact = qre_chem::artifact_path(ctx.artifact_dir, molecule_id);
        if !artifact.exists() {
            tracing::warn!(
                molecule = %molecule_id,
                path = %artifact.display(),
                "artifact missing, skipping molecule"
            );
            missing_artifacts += 1;
            continue;
        }
        processed_molecules += 1;
        for (spec_index, hash) in hashes.iter().enumerate() {
            let task_index = index;
            index += 1;
            if ctx.options.resume && ctx.tracker.is_done(molecule_id, hash) {
                tracing::debug!(
                    molecule = %molecule_id,
                    spec = %specs[spec_index].label(),
                    "task already done, skipping"
                );
                skipped += 1;
                continue;
            }
            pending.push(Task {
                index: task_index,
                molecule_id: molecule_id.clone(),
                artifact: artifact.clone(),
                spec_index,
                spec_hash: hash.clone(),
            });
        }
    }

    let total = processed_molecules * specs.len();
    tracing::info!(
        molecules = processed_molecules,
        specs = specs.len(),
        total,
        pending = pending.len(),
        skipped,
        "starting batch run"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.options.workers.max(1))
        .build()
        .map_err(|err| {
            QreError::Config(
                ErrorInfo::new("worker-pool", "failed to build worker pool")
                    .with_context("workers", ctx.options.workers.to_string())
                    .with_hint(err.to_string()),
            )
        })?;

    let rows: Mutex<Vec<(usize, ResultRow)>> = Mutex::new(Vec::new());
    let failed = AtomicUsize::new(0);
    let done_tally = AtomicUsize::new(skipped);
    let fatal: Mutex<Option<QreError>> = Mutex::new(None);

    pool.install(|| {
        pending.par_iter().for_each(|task| {
            if ctx.cancel.is_cancelled() {
                return;
            }
            let spec = &specs[task.spec_index];
            let logical = match estimate_with_timeout(
                Arc::clone(&ctx.estimator),
                &task.artifact,
                spec,
                ctx.options.task_timeout,
            ) {
                Ok(logical) => logical,
                Err(err) => {
                    tracing::error!(
                        molecule = %task.molecule_id,
                        spec = %spec.label(),
                        error = %err,
                        "task failed, continuing batch"
                    );
                    failed.fetch_add(1, Ordering::SeqCst);
                    return;
                }
            };
            let physical = logical_to_physical(&logical, &spec.fault_tolerance);
            let row = ResultRow::from_parts(&task.molecule_id, spec, &logical, &physical);

            // Result must be durable before the marker exists; a crash in
            // between re-runs the task on resume (at-least-once).
            if let Err(err) = ctx.sink.append(&ResultRow::COLUMNS, &row.values()) {
                record_fatal(&fatal, &ctx.cancel, err);
                return;
            }
            if let Err(err) = ctx.tracker.mark_done(&task.molecule_id, &task.spec_hash) {
                record_fatal(&fatal, &ctx.cancel, err);
                return;
            }

            let done = done_tally.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!(
                molecule = %task.molecule_id,
                spec = %spec.label(),
                done,
                total,
                "task completed"
            );
            match rows.lock() {
                Ok(mut guard) => guard.push((task.index, row)),
                Err(poisoned) => poisoned.into_inner().push((task.index, row)),
            }
        });
    });

    let fatal = match fatal.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(err) = fatal {
        return Err(err);
    }

    let mut indexed = match rows.into_inner() {
        Ok(rows) => rows,
        Err(poisoned) => poisoned.into_inner(),
    };
    indexed.sort_by_key(|(index, _)| *index);
    let rows: Vec<ResultRow> = indexed.into_iter().map(|(_, row)| row).collect();
    let report = BatchReport {
        completed: rows.len(),
        skipped,
        failed: failed.load(Ordering::SeqCst),
        missing_artifacts,
        total,
        rows,
    };
    tracing::info!(
        completed = report.completed,
        skipped = report.skipped,
        failed = report.failed,
        "batch run finished"
    );
    Ok(report)
}

fn record_fatal(fatal: &Mutex<Option<QreError>>, cancel: &CancelFlag, err: QreError) {
    tracing::error!(error = %err, "fatal storage failure, draining workers");
    let mut guard = match fatal.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.is_none() {
        *guard = Some(err);
    }
    cancel.cancel();
}

fn estimate_with_timeout(
    estimator: Arc<dyn ResourceEstimator>,
    artifact: &Path,
    spec: &AlgoSpec,
    timeout: Option<Duration>,
) -> Result<LogicalEstimate, QreError> {
    let Some(limit) = timeout else {
        return estimator.estimate(artifact, spec);
    };
    let (tx, rx) = mpsc::channel();
    let artifact = artifact.to_path_buf();
    let spec = spec.clone();
    thread::spawn(move || {
        let result = estimator.estimate(&artifact, &spec);
        // Receiver may have timed out and dropped; the late result is discarded.
        let _ = tx.send(result);
    });
    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(_) => Err(QreError::Compute(
            ErrorInfo::new("task-timeout", "estimation exceeded the per-task time limit")
                .with_context("limit_ms", limit.as_millis().to_string()),
        )),
    }
}
