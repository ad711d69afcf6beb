use std::error::Error;
use std::path::PathBuf;

use clap::Args as ClapArgs;

use qre_chem::{read_molecule_list, write_artifact_stub};

#[derive(ClapArgs, Debug)]
pub struct ConvertArgs {
    /// Molecule list file, one identifier per line.
    #[arg(long)]
    molecules: PathBuf,
    /// Output directory for Broombridge artifacts.
    #[arg(long)]
    out: PathBuf,
}

pub fn run(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let molecules = read_molecule_list(&args.molecules)?;
    for molecule_id in &molecules {
        let path = write_artifact_stub(&args.out, molecule_id)?;
        tracing::debug!(molecule = %molecule_id, path = %path.display(), "artifact written");
    }
    tracing::info!(
        count = molecules.len(),
        out = %args.out.display(),
        "artifact stubs written"
    );
    Ok(())
}
