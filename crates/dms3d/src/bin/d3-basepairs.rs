use std::path::PathBuf;
use clap::Parser;
use anyhow::Result;
use colored::*;
use log::info;

use d3_reports::PairType;

use dms3d::init_logging;
use dms3d::output::write_json;
use dms3d::input_parsers::structure_name;
use dms3d::input_parsers::read_basepairs_input;
use dms3d::dataset_parsers::BASEPAIR_SUFFIX;
use dms3d::dataset_parsers::VerbosityArguments;

#[derive(Debug, Parser)]
#[command(name = "d3-basepairs")]
#[command(version, about = "Base pairs and their parameters from a 3DNA report")]
pub struct Cli {
    /// 3DNA analyze output, or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Structure name (defaults to the file name).
    #[arg(long)]
    name: Option<String>,

    /// Only report Watson-Crick pairs.
    #[arg(long)]
    wc_only: bool,

    /// Write JSON here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    verbosity: VerbosityArguments,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity.verbose);

    let name = cli.name.clone()
        .unwrap_or_else(|| structure_name(&cli.input, BASEPAIR_SUFFIX));
    let mut records = read_basepairs_input(&cli.input, &name)?;
    if cli.wc_only {
        records.retain(|r| r.is_watson_crick());
    }

    for r in &records {
        let tag = match r.pair_type {
            PairType::WatsonCrick => r.pair_type.to_string().green(),
            PairType::NonWatsonCrick => r.pair_type.to_string().magenta(),
        };
        info!("{:>4} {:>4} {} {}", r.residue_index_1, r.residue_index_2, r.base_pair_code, tag);
    }
    write_json(&records, cli.output.as_deref())?;
    Ok(())
}
