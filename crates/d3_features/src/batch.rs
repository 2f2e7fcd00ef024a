//! Per-structure pipeline and the parallel runner over many structures.

use std::path::PathBuf;

use colored::*;
use log::{debug, error, info, warn};
use rayon::prelude::*;

use d3_reports::BasePairRecord;
use d3_reports::TorsionRecord;
use d3_reports::parse_basepair_file;
use d3_reports::parse_torsion_file;
use d3_geometry::AtomTable;
use d3_geometry::BasePairCode;
use d3_geometry::IdealLibrary;
use d3_geometry::rmsd_for_base_pair;

use crate::FeatureError;
use crate::assembly::EvaluatedBasePair;
use crate::reactivity::motif_label;

/// The input files of one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureJob {
    pub name: String,
    /// Motif label as in the dataset layout (`_` separates strands).
    pub motif: String,
    pub pdb_path: PathBuf,
    pub torsion_report: PathBuf,
    pub basepair_report: PathBuf,
}

/// Base pairs of one structure; the Watson-Crick ones carry their RMSD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureFeatures {
    pub base_pairs: Vec<BasePairRecord>,
    pub watson_crick: Vec<EvaluatedBasePair>,
}

/// RMSD of one base pair to its ideal reference, `None` if unavailable.
///
/// Unavailability is never an error here: it is logged and the pair is
/// kept without a value.
pub fn evaluate_base_pair(
    record: &BasePairRecord,
    library: &IdealLibrary,
    experimental: &AtomTable,
) -> Option<f64> {
    let residues = (record.residue_index_1, record.residue_index_2);
    let ideal = BasePairCode::try_from(record.base_pair_code.as_str())
        .ok()
        .and_then(|code| library.get(&code));
    let Some(ideal) = ideal else {
        warn!("{} no ideal reference for {} in {}.",
            "WARNING:".red(), record.base_pair_code, record.structure_name);
        return None;
    };

    match rmsd_for_base_pair(&record.base_pair_code, ideal, experimental, residues) {
        Ok(Some(value)) => {
            debug!("RMSD for {} at residues {}, {}: {:.4}",
                record.base_pair_code, residues.0, residues.1, value);
            Some(value)
        }
        Ok(None) => {
            warn!("{} no matching atoms for {} at residues {}, {} in {}.",
                "WARNING:".red(), record.base_pair_code, residues.0, residues.1,
                record.structure_name);
            None
        }
        Err(e) => {
            warn!("{} RMSD of {} at residues {}, {} in {}: {}",
                "WARNING:".red(), record.base_pair_code, residues.0, residues.1,
                record.structure_name, e);
            None
        }
    }
}

/// Attaches an RMSD to every Watson-Crick pair; other pairs are dropped.
pub fn evaluate_watson_crick(
    records: &[BasePairRecord],
    library: &IdealLibrary,
    experimental: &AtomTable,
) -> Vec<EvaluatedBasePair> {
    records.iter()
        .filter(|r| r.is_watson_crick())
        .map(|r| EvaluatedBasePair {
            record: r.clone(),
            rmsd: evaluate_base_pair(r, library, experimental),
        })
        .collect()
}

/// Parses the base-pair report of a structure and evaluates its
/// Watson-Crick pairs against the ideal library.
///
/// The coordinate file is only read if there are Watson-Crick pairs.
pub fn process_structure(job: &StructureJob, library: &IdealLibrary) -> Result<StructureFeatures, FeatureError> {
    let base_pairs = parse_basepair_file(&job.basepair_report, &job.name)?;
    if !base_pairs.iter().any(BasePairRecord::is_watson_crick) {
        info!("No Watson-Crick pairs in {}.", job.name);
        return Ok(StructureFeatures { base_pairs, watson_crick: Vec::new() });
    }
    let experimental = AtomTable::from_pdb_file(&job.pdb_path)?;
    let watson_crick = evaluate_watson_crick(&base_pairs, library, &experimental);
    Ok(StructureFeatures { base_pairs, watson_crick })
}

/// Parses the torsion report of a structure, labelling the motif with `&`.
pub fn process_torsions(job: &StructureJob) -> Result<Vec<TorsionRecord>, FeatureError> {
    info!("Processing file: {}", job.torsion_report.display());
    Ok(parse_torsion_file(&job.torsion_report, &job.name, &motif_label(&job.motif))?)
}

/// Runs `task` on every job in parallel, in job order.
///
/// A failing structure is logged and left out; the others are unaffected.
/// `progress` is called once per finished job.
pub fn run_batch<T, F, P>(jobs: &[StructureJob], task: F, progress: P) -> Vec<T>
where
    T: Send,
    F: Fn(&StructureJob) -> Result<T, FeatureError> + Sync,
    P: Fn() + Sync,
{
    let results: Vec<T> = jobs.par_iter()
        .filter_map(|job| {
            let outcome = task(job);
            progress();
            match outcome {
                Ok(value) => Some(value),
                Err(e) if e.is_recoverable() => {
                    warn!("{} skipping {}: {}", "WARNING:".red(), job.name, e);
                    None
                }
                Err(e) => {
                    error!("{} failed: {}", job.name, e);
                    None
                }
            }
        })
        .collect();

    if results.is_empty() && !jobs.is_empty() {
        error!("No data was processed. Check for missing files or errors.");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use nalgebra::Point3;
    use d3_geometry::Base;

    const REPORT: &str = "\
File name: data/pdbs/GG_CC/construct_1.pdb
   1   (0.008) ....>-:...4_:[..G]G-----C[..C]:...9_:-<....  (0.010)     |
   2   (0.012) ....>-:...5_:[..G]G-**+-G[..G]:...6_:-<....  (0.009)     |
****************************************************************************
Local base-pair parameters
     bp        Shear    Stretch   Stagger    Buckle  Propeller  Opening
     1 G-C      -0.21     -0.13     -0.08     -2.81     -9.19     -1.41
     2 G+G       1.10      0.50      0.20      3.00      1.00    -80.00
~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
";

    fn atom_line(serial: usize, atom: &str, residue: i32, p: &Point3<f64>) -> String {
        format!("ATOM  {:>5} {:<4}   G A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
            serial, format!(" {}", atom), residue, p.x, p.y, p.z)
    }

    fn pair_coordinates(pair: (i32, i32), shift: f64) -> (AtomTable, String) {
        let mut table = AtomTable::new();
        let mut pdb = String::new();
        let mut serial = 1;
        for (slot, base, residue) in [(1, Base::G, pair.0), (2, Base::C, pair.1)] {
            for (k, atom) in base.canonical_atoms().iter().enumerate() {
                let a = k as f64 * 0.7 + slot as f64;
                let p = Point3::new(
                    slot as f64 * 5.0 + a.cos() * 1.4 + shift,
                    a.sin() * 1.4,
                    0.07 * k as f64,
                );
                table.insert(slot, atom, p);
                pdb.push_str(&atom_line(serial, atom, residue, &p));
                pdb.push('\n');
                serial += 1;
            }
        }
        (table, pdb)
    }

    fn job(dir: &Path) -> StructureJob {
        StructureJob {
            name: "construct_1".to_string(),
            motif: "GG_CC".to_string(),
            pdb_path: dir.join("construct_1.pdb"),
            torsion_report: dir.join("construct_1_torsions.txt"),
            basepair_report: dir.join("construct_1_x3dna.out"),
        }
    }

    #[test]
    fn test_process_structure() {
        let dir = std::env::temp_dir().join(format!("d3_batch_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // The experimental pair is the ideal one, translated.
        let (_, pdb) = pair_coordinates((4, 9), 3.0);
        let (reference, _) = pair_coordinates((1, 2), 0.0);
        fs::write(dir.join("construct_1.pdb"), pdb).unwrap();
        fs::write(dir.join("construct_1_x3dna.out"), REPORT).unwrap();

        let mut library = IdealLibrary::new();
        library.insert(BasePairCode(Base::G, Base::C), reference);

        let job = job(&dir);
        let features = process_structure(&job, &library).unwrap();
        let torsions = process_torsions(&job);
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(features.base_pairs.len(), 2);
        assert_eq!(features.base_pairs[0].motif_id, "GG_CC");
        assert_eq!(features.watson_crick.len(), 1);
        let wc = &features.watson_crick[0];
        assert_eq!(wc.residues(), (4, 9));
        assert!(wc.rmsd.unwrap() < 1e-3);
        assert!(wc.is_flanking());

        assert!(matches!(
            torsions,
            Err(FeatureError::Report(d3_reports::ReportError::MissingInput(_)))
        ));
    }

    #[test]
    fn test_missing_reference_gives_unavailable_rmsd() {
        let (experimental, _) = pair_coordinates((4, 9), 0.0);
        let record = BasePairRecord {
            structure_name: "construct_1".to_string(),
            motif_id: "GG_CC".to_string(),
            pair_type: d3_reports::PairType::WatsonCrick,
            residue_index_1: 4,
            residue_index_2: 9,
            base_pair_code: "GC".to_string(),
            parameters: Default::default(),
        };
        let library = IdealLibrary::new();
        assert_eq!(evaluate_base_pair(&record, &library, &experimental), None);
        let evaluated = evaluate_watson_crick(&[record], &library, &experimental);
        assert_eq!(evaluated.len(), 1);
        assert_eq!(evaluated[0].rmsd, None);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = std::env::temp_dir().join(format!("d3_batch_iso_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("construct_1_x3dna.out"), REPORT).unwrap();
        // Two identities but only one geometry row.
        let uncorrelated = REPORT.replace(
            "     2 G+G       1.10      0.50      0.20      3.00      1.00    -80.00\n", "");
        fs::write(dir.join("construct_3_x3dna.out"), uncorrelated).unwrap();

        let good = job(&dir);
        let missing = StructureJob {
            name: "construct_2".to_string(),
            basepair_report: dir.join("construct_2_x3dna.out"),
            ..good.clone()
        };
        let broken = StructureJob {
            name: "construct_3".to_string(),
            basepair_report: dir.join("construct_3_x3dna.out"),
            ..good.clone()
        };
        let err = parse_basepair_file(&broken.basepair_report, &broken.name).unwrap_err();
        assert!(matches!(err, d3_reports::ReportError::CorrelationFailure { .. }));
        assert!(!FeatureError::from(err).is_recoverable());

        let jobs = vec![missing.clone(), broken, good, missing];

        let done = AtomicUsize::new(0);
        let counts = run_batch(
            &jobs,
            |job| Ok(parse_basepair_file(&job.basepair_report, &job.name)?.len()),
            || { done.fetch_add(1, Ordering::Relaxed); },
        );
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(counts, vec![2]);
        assert_eq!(done.load(Ordering::Relaxed), 4);
    }
}
