use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use clap::ArgAction;
use log::{debug, info};

use d3_features::StructureJob;

/// Report file suffixes written next to each other in the report directory.
pub const TORSION_SUFFIX: &str = "_torsions";
pub const BASEPAIR_SUFFIX: &str = "_x3dna";

/// Where the structures, reports and references of a dataset live.
#[derive(Debug, Args)]
pub struct DatasetArguments {
    /// Structures, one directory per motif: <PDB_DIR>/<MOTIF>/<NAME>.pdb
    #[arg(long, value_name = "DIR", default_value = "data/pdbs")]
    pub pdb_dir: PathBuf,

    /// DSSR and 3DNA reports: <NAME>_torsions.txt and <NAME>_x3dna.out
    #[arg(long, value_name = "DIR", default_value = "data/dssr-output")]
    pub report_dir: PathBuf,

    /// Ideal base-pair references: <IDEAL_DIR>/<BP>.pdb
    #[arg(long, value_name = "DIR", default_value = "resources/ideal_pdbs")]
    pub ideal_dir: PathBuf,

    /// Per-residue reactivity records (JSON).
    #[arg(long, value_name = "FILE")]
    pub reactivity: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct VerbosityArguments {
    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl DatasetArguments {
    pub fn validate(&self) -> Result<()> {
        if !self.pdb_dir.is_dir() {
            bail!("Structure directory {} does not exist", self.pdb_dir.display());
        }
        if !self.report_dir.is_dir() {
            bail!("Report directory {} does not exist", self.report_dir.display());
        }
        Ok(())
    }

    /// One job per structure file, sorted by path.
    pub fn discover(&self) -> Result<Vec<StructureJob>> {
        discover_structures(&self.pdb_dir, &self.report_dir)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Finds `<pdb_dir>/<MOTIF>/<NAME>.pdb` and pairs every structure with its
/// report paths. Reports are not required to exist.
pub fn discover_structures(pdb_dir: &Path, report_dir: &Path) -> Result<Vec<StructureJob>> {
    let mut jobs = Vec::new();
    for motif_dir in sorted_entries(pdb_dir)? {
        if !motif_dir.is_dir() {
            continue;
        }
        let Some(motif) = motif_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        for pdb_path in sorted_entries(&motif_dir)? {
            if pdb_path.extension().and_then(|e| e.to_str()) != Some("pdb") {
                continue;
            }
            let Some(name) = pdb_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!("Found structure {} of motif {}.", name, motif);
            jobs.push(StructureJob {
                name: name.to_string(),
                motif: motif.to_string(),
                torsion_report: report_dir.join(format!("{}{}.txt", name, TORSION_SUFFIX)),
                basepair_report: report_dir.join(format!("{}{}.out", name, BASEPAIR_SUFFIX)),
                pdb_path,
            });
        }
    }
    info!("Found {} structures in {}.", jobs.len(), pdb_dir.display());
    Ok(jobs)
}
