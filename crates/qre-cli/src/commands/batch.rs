use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Args as ClapArgs;

use qre_batch::{run_batch, BatchContext, BatchOptions, CancelFlag, CsvSink, DoneTracker, RunManifest};
use qre_chem::read_molecule_list;
use qre_core::{stable_hash_short, ErrorInfo, QreError};
use qre_est::HeuristicEstimator;
use qre_spec::SweepGrid;

#[derive(ClapArgs, Debug)]
pub struct BatchArgs {
    /// YAML sweep grid configuration.
    #[arg(long)]
    grid: PathBuf,
    /// Directory containing per-molecule Broombridge artifacts.
    #[arg(long)]
    artifacts: PathBuf,
    /// Molecule list file, one identifier per line.
    #[arg(long)]
    molecules: PathBuf,
    /// Output CSV table path.
    #[arg(long)]
    out: PathBuf,
    /// Done-marker directory (defaults to `.done` beside the output table).
    #[arg(long)]
    done_dir: Option<PathBuf>,
    /// Skip tasks whose done marker already exists.
    #[arg(long)]
    resume: bool,
    /// Worker pool size (defaults to available hardware parallelism).
    #[arg(long)]
    workers: Option<usize>,
}

pub fn run(args: &BatchArgs) -> Result<(), Box<dyn Error>> {
    if !args.artifacts.is_dir() {
        return Err(QreError::Config(
            ErrorInfo::new("artifact-dir-missing", "artifact directory not found")
                .with_context("path", args.artifacts.display().to_string()),
        )
        .into());
    }

    let grid = SweepGrid::load(&args.grid)?;
    let specs = grid.expand()?;
    let molecules = read_molecule_list(&args.molecules)?;
    tracing::info!(
        molecules = molecules.len(),
        specs = specs.len(),
        "sweep inputs loaded"
    );

    let done_dir = args.done_dir.clone().unwrap_or_else(|| {
        args.out
            .parent()
            .map(|parent| parent.join(".done"))
            .unwrap_or_else(|| PathBuf::from(".done"))
    });
    let tracker = DoneTracker::new(done_dir)?;
    let sink = CsvSink::new(&args.out);
    let options = BatchOptions {
        resume: args.resume,
        workers: args
            .workers
            .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(1)),
        task_timeout: None,
    };
    let ctx = BatchContext {
        artifact_dir: &args.artifacts,
        sink: &sink,
        tracker: &tracker,
        estimator: Arc::new(HeuristicEstimator::new()),
        options,
        cancel: CancelFlag::new(),
    };
    let report = run_batch(&molecules, &specs, &ctx)?;

    let manifest = RunManifest::from_report(
        stable_hash_short(&grid)?,
        molecules.len(),
        specs.len(),
        &report,
    );
    let mut manifest_path = args.out.clone();
    manifest_path.set_extension("manifest.json");
    manifest.write(&manifest_path)?;

    tracing::info!(
        completed = report.completed,
        skipped = report.skipped,
        failed = report.failed,
        out = %args.out.display(),
        "batch run written"
    );
    Ok(())
}
