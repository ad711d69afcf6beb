use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, ValueEnum};
use csv::ReaderBuilder;

use qre_core::{ErrorInfo, QreError};

/// Optimization objective mapped onto a result table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Objective {
    /// Minimize T-gate count.
    MinT,
    /// Minimize logical circuit depth.
    MinDepth,
    /// Minimize estimated logical runtime.
    MinRuntime,
    /// Minimize physical qubit count.
    MinPhysicalQubits,
}

impl Objective {
    fn column(&self) -> &'static str {
        match self {
            Objective::MinT => "t_count",
            Objective::MinDepth => "circuit_depth",
            Objective::MinRuntime => "est_runtime_sec",
            Objective::MinPhysicalQubits => "physical_qubits",
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct RecommendArgs {
    /// Result table produced by `qre batch`.
    #[arg(long, default_value = "data/resource_estimates.csv")]
    csv: PathBuf,
    /// Molecule identifier to analyze.
    #[arg(long)]
    molecule: String,
    /// Optimization objective.
    #[arg(long, value_enum, default_value_t = Objective::MinT)]
    objective: Objective,
    /// Maximum acceptable chemical error in milli-Hartree.
    #[arg(long, default_value_t = 1.6)]
    chem_acc: f64,
}

/// The winning row, keyed by header name, plus its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub fields: BTreeMap<String, String>,
    pub objective_value: f64,
    pub candidates: usize,
}

pub fn run(args: &RecommendArgs) -> Result<(), Box<dyn Error>> {
    let best = recommend_from_table(&args.csv, &args.molecule, args.objective, args.chem_acc)?;
    println!(
        "optimal setting for {} over {} candidate(s) ({} = {}):",
        args.molecule,
        best.candidates,
        args.objective.column(),
        best.objective_value
    );
    for (key, value) in &best.fields {
        println!("  {key:22} {value}");
    }
    Ok(())
}

/// Pure filter + argmin over an already-materialized result table.
pub fn recommend_from_table(
    path: &Path,
    molecule: &str,
    objective: Objective,
    chem_acc: f64,
) -> Result<Recommendation, QreError> {
    if !path.exists() {
        return Err(QreError::Config(
            ErrorInfo::new("table-missing", "result table not found")
                .with_context("path", path.display().to_string())
                .with_hint("run `qre batch` first"),
        ));
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| {
            QreError::Storage(
                ErrorInfo::new("table-read", "failed to open result table")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| wrap_csv("table-header", err))?
        .iter()
        .map(str::to_string)
        .collect();
    let molecule_idx = column_index(&headers, "molecule_id")?;
    let error_idx = column_index(&headers, "target_error_mHa")?;
    let objective_idx = column_index(&headers, objective.column())?;

    let mut best: Option<(f64, BTreeMap<String, String>)> = None;
    let mut candidates = 0usize;
    for record in reader.records() {
        let record = record.map_err(|err| wrap_csv("table-record", err))?;
        if record.get(molecule_idx) != Some(molecule) {
            continue;
        }
        let target_error: f64 = parse_field(&record, error_idx, "target_error_mHa")?;
        if target_error > chem_acc {
            continue;
        }
        candidates += 1;
        let value: f64 = parse_field(&record, objective_idx, objective.column())?;
        if best.as_ref().map(|(min, _)| value < *min).unwrap_or(true) {
            let fields = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            best = Some((value, fields));
        }
    }
    let (objective_value, fields) = best.ok_or_else(|| {
        QreError::Config(
            ErrorInfo::new("no-candidates", "no rows match the molecule and accuracy bound")
                .with_context("molecule", molecule)
                .with_context("chem_acc_mHa", chem_acc.to_string()),
        )
    })?;
    Ok(Recommendation {
        fields,
        objective_value,
        candidates,
    })
}

fn column_index(headers: &[String], name: &str) -> Result<usize, QreError> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        QreError::Schema(
            ErrorInfo::new("table-column", "result table is missing a required column")
                .with_context("column", name),
        )
    })
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, QreError> {
    record
        .get(idx)
        .and_then(|raw| raw.parse::<f64>().ok())
        .ok_or_else(|| {
            QreError::Schema(
                ErrorInfo::new("table-field", "result table field is not numeric")
                    .with_context("column", name),
            )
        })
}

fn wrap_csv(code: &str, err: csv::Error) -> QreError {
    QreError::Storage(ErrorInfo::new(code, "result table read failure").with_hint(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TABLE: &str = "\
molecule_id,basis,encoding,target_error_mHa,t_count,circuit_depth,est_runtime_sec,physical_qubits
H2O,STO-3G,JW,1.6,2000000000,5000000000,12000,8000
H2O,STO-3G,BK,1.6,1500000000,4000000000,11000,9000
H2O,6-31G,JW,0.8,1800000000,4500000000,11500,7000
CH4,STO-3G,JW,1.6,900000000,2500000000,9000,6000
";

    fn write_table(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("results.csv");
        fs::write(&path, TABLE).unwrap();
        path
    }

    #[test]
    fn argmin_respects_molecule_and_accuracy_filters() {
        let dir = TempDir::new().unwrap();
        let path = write_table(&dir);
        let best = recommend_from_table(&path, "H2O", Objective::MinT, 1.6).unwrap();
        assert_eq!(best.candidates, 3);
        // CH4's smaller t_count is filtered out by molecule.
        assert_eq!(best.fields.get("encoding").map(String::as_str), Some("BK"));
        assert_eq!(best.objective_value, 1.5e9);

        let tight = recommend_from_table(&path, "H2O", Objective::MinT, 1.0).unwrap();
        assert_eq!(tight.candidates, 1);
        assert_eq!(tight.fields.get("basis").map(String::as_str), Some("6-31G"));
    }

    #[test]
    fn objective_selects_its_column() {
        let dir = TempDir::new().unwrap();
        let path = write_table(&dir);
        let best = recommend_from_table(&path, "H2O", Objective::MinPhysicalQubits, 1.6).unwrap();
        assert_eq!(best.objective_value, 7000.0);
    }

    #[test]
    fn no_matching_rows_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_table(&dir);
        let err = recommend_from_table(&path, "NH3", Objective::MinT, 1.6).unwrap_err();
        assert!(matches!(err, QreError::Config(_)));
    }
}
