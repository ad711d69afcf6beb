use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    batch::{self, BatchArgs},
    convert::{self, ConvertArgs},
    recommend::{self, RecommendArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "qre", about = "Quantum resource estimation sweep CLI")]
struct Cli {
    /// Enable debug-level diagnostics.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write Broombridge artifact stubs for a molecule list.
    Convert(ConvertArgs),
    /// Run a resumable batch sweep over molecules and grid-expanded specs.
    Batch(BatchArgs),
    /// Recommend the best algorithm setting from a materialized result table.
    Recommend(RecommendArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Convert(args) => convert::run(&args),
        Command::Batch(args) => batch::run(&args),
        Command::Recommend(args) => recommend::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
