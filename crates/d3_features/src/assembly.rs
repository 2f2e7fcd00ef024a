use log::info;
use serde::{Serialize, Deserialize};

use d3_reports::BasePairRecord;
use d3_reports::StepParameters;

use crate::flanking::is_flanking_pair;
use crate::reactivity::motif_label;
use crate::reactivity::ReactivityTable;

/// A base pair with its RMSD to the ideal geometry of its type.
///
/// `rmsd` is `None` when the deviation could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedBasePair {
    #[serde(flatten)]
    pub record: BasePairRecord,
    pub rmsd: Option<f64>,
}

impl EvaluatedBasePair {
    pub const COLUMNS: [&'static str; 13] = [
        "name", "motif", "r_type", "res_num1", "res_num2", "bp",
        "shear", "stretch", "stagger", "buckle", "propeller", "opening",
        "rmsd",
    ];

    pub fn residues(&self) -> (i32, i32) {
        (self.record.residue_index_1, self.record.residue_index_2)
    }

    pub fn is_flanking(&self) -> bool {
        is_flanking_pair(&self.record.motif_id, self.residues())
    }
}

/// One reactivity observation of one evaluated base pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub m_sequence: String,
    pub bp: String,
    pub pdb_r_pos1: i32,
    pub pdb_r_pos2: i32,
    pub rmsd_from_ideal: Option<f64>,
    #[serde(flatten)]
    pub parameters: StepParameters,
    pub r_data: f64,
    pub flanking_pairs: bool,
}

impl FeatureRecord {
    pub const COLUMNS: [&'static str; 13] = [
        "m_sequence", "bp", "pdb_r_pos1", "pdb_r_pos2", "rmsd_from_ideal",
        "shear", "stretch", "stagger", "buckle", "propeller", "opening",
        "r_data", "flanking_pairs",
    ];
}

/// Joins evaluated base pairs with their reactivity observations.
///
/// Each pair yields one record per observation of its first residue, or of
/// its second residue if the first has none. Pairs without observations
/// are skipped.
pub fn assemble_features(pairs: &[EvaluatedBasePair], reactivity: &ReactivityTable) -> Vec<FeatureRecord> {
    let mut features = Vec::new();
    for pair in pairs {
        let rec = &pair.record;
        let Some(observations) = reactivity.for_base_pair(
            &rec.motif_id, &rec.base_pair_code, pair.residues()
        ) else {
            info!("No reactivity for {} {} at {:?}, skipping.",
                rec.motif_id, rec.base_pair_code, pair.residues());
            continue;
        };

        let m_sequence = motif_label(&rec.motif_id);
        let flanking_pairs = pair.is_flanking();
        for &r_data in observations {
            features.push(FeatureRecord {
                m_sequence: m_sequence.clone(),
                bp: rec.base_pair_code.clone(),
                pdb_r_pos1: rec.residue_index_1,
                pdb_r_pos2: rec.residue_index_2,
                rmsd_from_ideal: pair.rmsd,
                parameters: rec.parameters,
                r_data,
                flanking_pairs,
            });
        }
    }
    features
}

/// Aggregate of the available RMSD values; unavailable ones are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RmsdSummary {
    pub evaluated: usize,
    pub available: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

impl RmsdSummary {
    pub fn from_pairs(pairs: &[EvaluatedBasePair]) -> Self {
        let values: Vec<f64> = pairs.iter().filter_map(|p| p.rmsd).collect();
        let mean = (!values.is_empty())
            .then(|| values.iter().sum::<f64>() / values.len() as f64);
        let max = values.iter().copied().reduce(f64::max);
        RmsdSummary {
            evaluated: pairs.len(),
            available: values.len(),
            mean,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use d3_reports::PairType;

    fn pair(motif: &str, code: &str, residues: (i32, i32), rmsd: Option<f64>) -> EvaluatedBasePair {
        EvaluatedBasePair {
            record: BasePairRecord {
                structure_name: "construct_1".to_string(),
                motif_id: motif.to_string(),
                pair_type: PairType::WatsonCrick,
                residue_index_1: residues.0,
                residue_index_2: residues.1,
                base_pair_code: code.to_string(),
                parameters: StepParameters { shear: -0.2, opening: -1.4, ..Default::default() },
            },
            rmsd,
        }
    }

    fn reactivity() -> ReactivityTable {
        ReactivityTable::from_json_str(r#"[
            {"m_sequence": "GG&CC", "r_nuc": "G", "pdb_r_pos": 4, "r_data": 0.3},
            {"m_sequence": "GG&CC", "r_nuc": "G", "pdb_r_pos": 4, "r_data": 0.4},
            {"m_sequence": "GG&CC", "r_nuc": "C", "pdb_r_pos": 6, "r_data": 0.9}
        ]"#).unwrap()
    }

    #[test]
    fn test_one_feature_per_observation() {
        let pairs = [
            pair("GG_CC", "GC", (4, 9), Some(0.25)),
            pair("GG_CC", "GC", (5, 6), None),
            pair("GG_CC", "UA", (7, 8), Some(0.1)),
        ];
        let features = assemble_features(&pairs, &reactivity());
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].m_sequence, "GG&CC");
        assert_eq!(features[0].r_data, 0.3);
        assert_eq!(features[1].r_data, 0.4);
        assert!(features[0].flanking_pairs);
        assert_eq!(features[0].rmsd_from_ideal, Some(0.25));

        // Looked up through the second residue.
        assert_eq!(features[2].pdb_r_pos1, 5);
        assert_eq!(features[2].r_data, 0.9);
        assert!(!features[2].flanking_pairs);
        assert_eq!(features[2].rmsd_from_ideal, None);
    }

    #[test]
    fn test_feature_columns() {
        let features = assemble_features(&[pair("GG_CC", "GC", (4, 9), None)], &reactivity());
        let json = serde_json::to_value(&features[0]).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FeatureRecord::COLUMNS.len());
        for c in FeatureRecord::COLUMNS {
            assert!(obj.contains_key(c), "missing column {}", c);
        }
        assert!(obj["rmsd_from_ideal"].is_null());
        assert_eq!(obj["flanking_pairs"], serde_json::json!(true));

        let evaluated = serde_json::to_value(pair("GG_CC", "GC", (4, 9), Some(0.5))).unwrap();
        assert_eq!(evaluated.as_object().unwrap().len(), EvaluatedBasePair::COLUMNS.len());
        assert_eq!(evaluated["rmsd"], serde_json::json!(0.5));
    }

    #[test]
    fn test_rmsd_summary_ignores_unavailable() {
        let pairs = [
            pair("GG_CC", "GC", (4, 9), Some(0.2)),
            pair("GG_CC", "GC", (5, 6), None),
            pair("GG_CC", "GC", (3, 10), Some(0.4)),
        ];
        let summary = RmsdSummary::from_pairs(&pairs);
        assert_eq!(summary.evaluated, 3);
        assert_eq!(summary.available, 2);
        assert!((summary.mean.unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(summary.max, Some(0.4));
        assert_eq!(RmsdSummary::from_pairs(&[]).mean, None);
    }
}
