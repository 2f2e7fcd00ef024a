use std::path::PathBuf;
use clap::Parser;
use anyhow::Result;
use colored::*;
use log::{info, warn};
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

use d3_reports::BasePairRecord;
use d3_geometry::IdealLibrary;
use d3_features::RmsdSummary;
use d3_features::ReactivityTable;
use d3_features::EvaluatedBasePair;
use d3_features::run_batch;
use d3_features::process_structure;
use d3_features::assemble_features;

use dms3d::init_logging;
use dms3d::output::write_json;
use dms3d::dataset_parsers::DatasetArguments;
use dms3d::dataset_parsers::VerbosityArguments;

#[derive(Debug, Parser)]
#[command(name = "d3-features")]
#[command(version, about = "Base-pair features: RMSD to ideal geometry, flanking pairs and reactivity")]
pub struct Cli {
    /// Directory for all_bp_details.json, wc_with_rmsd.json and wc_details.json
    #[arg(short, long, value_name = "DIR", default_value = "features")]
    output_dir: PathBuf,

    #[command(flatten, next_help_heading = "Dataset")]
    dataset: DatasetArguments,

    #[command(flatten)]
    verbosity: VerbosityArguments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity.verbose);
    cli.dataset.validate()?;

    let jobs = cli.dataset.discover()?;
    let library = IdealLibrary::load_all(&cli.dataset.ideal_dir)?;
    if library.is_empty() {
        warn!("{} no ideal references in {}, RMSD values will be unavailable.",
            "WARNING:".red(), cli.dataset.ideal_dir.display());
    }

    println!("Processing {} structures:", jobs.len());
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
        .progress_chars("#>-"),
    );
    let structures = run_batch(&jobs, |job| process_structure(job, &library), || pb.inc(1));
    pb.finish_with_message("All structures processed!");

    let mut all_pairs: Vec<BasePairRecord> = Vec::new();
    let mut watson_crick: Vec<EvaluatedBasePair> = Vec::new();
    for s in structures {
        all_pairs.extend(s.base_pairs);
        watson_crick.extend(s.watson_crick);
    }

    let summary = RmsdSummary::from_pairs(&watson_crick);
    println!("{} base pairs, {} Watson-Crick, {} with RMSD (mean {}).",
        all_pairs.len(), summary.evaluated, summary.available,
        summary.mean.map_or("n/a".to_string(), |m| format!("{:.3}", m)).green());

    write_json(&all_pairs, Some(cli.output_dir.join("all_bp_details.json").as_path()))?;
    write_json(&watson_crick, Some(cli.output_dir.join("wc_with_rmsd.json").as_path()))?;

    let Some(reactivity_path) = &cli.dataset.reactivity else {
        warn!("{} no --reactivity given, skipping wc_details.json.", "WARNING:".red());
        return Ok(());
    };
    let reactivity = ReactivityTable::from_json_file(reactivity_path)?;
    info!("Reactivity for {} residues.", reactivity.len());
    let features = assemble_features(&watson_crick, &reactivity);
    write_json(&features, Some(cli.output_dir.join("wc_details.json").as_path()))?;
    println!("{} feature records.", features.len());

    Ok(())
}
