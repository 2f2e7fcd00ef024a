use std::path::PathBuf;
use clap::Parser;
use anyhow::{bail, Result};
use colored::*;
use log::info;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

use d3_reports::TorsionRecord;
use d3_features::run_batch;
use d3_features::process_torsions;

use dms3d::init_logging;
use dms3d::output::write_json;
use dms3d::input_parsers::structure_name;
use dms3d::input_parsers::read_torsions_input;
use dms3d::dataset_parsers::TORSION_SUFFIX;
use dms3d::dataset_parsers::DatasetArguments;
use dms3d::dataset_parsers::VerbosityArguments;

#[derive(Debug, Parser)]
#[command(name = "d3-torsions")]
#[command(version, about = "Per-nucleotide torsions from DSSR torsion reports")]
pub struct Cli {
    /// A single torsion report, or "-" for stdin. Without it, every
    /// structure of the dataset is processed.
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Structure name of a single report (defaults to the file name).
    #[arg(long)]
    name: Option<String>,

    /// Motif of a single report, e.g. GAC&GUC.
    #[arg(long)]
    motif: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten, next_help_heading = "Dataset")]
    dataset: DatasetArguments,

    #[command(flatten)]
    verbosity: VerbosityArguments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity.verbose);

    let records: Vec<TorsionRecord> = if let Some(input) = &cli.input {
        let Some(motif) = &cli.motif else {
            bail!("--motif is required for a single report");
        };
        let name = cli.name.clone()
            .unwrap_or_else(|| structure_name(input, TORSION_SUFFIX));
        info!("{}", format!(">{} {}", name, motif).yellow());
        read_torsions_input(input, &name, motif)?
    } else {
        cli.dataset.validate()?;
        let jobs = cli.dataset.discover()?;
        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
        );
        let per_structure = run_batch(&jobs, process_torsions, || pb.inc(1));
        pb.finish_with_message("All torsion reports parsed!");
        per_structure.into_iter().flatten().collect()
    };

    info!("{} torsion records.", records.len());
    write_json(&records, cli.output.as_deref())?;
    Ok(())
}
