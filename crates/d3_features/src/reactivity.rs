//! Per-residue chemical reactivity observations.

use std::fs;
use std::io;
use std::path::Path;

use ahash::AHashMap;
use log::debug;
use serde::{Serialize, Deserialize};

use crate::FeatureError;

/// A reactivity value as stored in residue records, either a single
/// observation or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observation {
    One(f64),
    Many(Vec<f64>),
}

/// One residue record of a reactivity dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactivityRecord {
    pub m_sequence: String,
    pub r_nuc: String,
    pub pdb_r_pos: i32,
    pub r_data: Observation,
}

/// Motif label (`&`-separated), nucleotide letter, residue number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReactivityKey {
    pub motif: String,
    pub nucleotide: char,
    pub position: i32,
}

impl ReactivityKey {
    /// Builds a key, normalizing the `_` strand separator to `&`.
    pub fn new(motif: &str, nucleotide: char, position: i32) -> Self {
        ReactivityKey {
            motif: motif_label(motif),
            nucleotide,
            position,
        }
    }
}

/// The motif label with `&` as strand separator.
pub fn motif_label(motif: &str) -> String {
    motif.replace('_', "&")
}

/// All reactivity observations, grouped by residue.
#[derive(Debug, Clone, Default)]
pub struct ReactivityTable {
    observations: AHashMap<ReactivityKey, Vec<f64>>,
}

impl ReactivityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups records by key, keeping observations in record order.
    pub fn from_records<I: IntoIterator<Item = ReactivityRecord>>(records: I) -> Self {
        let mut table = ReactivityTable::new();
        for rec in records {
            let Some(nucleotide) = rec.r_nuc.chars().next() else {
                debug!("Skipping reactivity record without nucleotide at {}.", rec.pdb_r_pos);
                continue;
            };
            let key = ReactivityKey::new(&rec.m_sequence, nucleotide, rec.pdb_r_pos);
            match rec.r_data {
                Observation::One(v) => table.push(key, v),
                Observation::Many(vs) => {
                    for v in vs {
                        table.push(key.clone(), v);
                    }
                }
            }
        }
        table
    }

    /// Reads a JSON array of residue records.
    pub fn from_json_str(text: &str) -> Result<Self, FeatureError> {
        let records: Vec<ReactivityRecord> = serde_json::from_str(text)?;
        Ok(Self::from_records(records))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FeatureError::MissingInput(path.to_path_buf()),
            _ => FeatureError::Io(e),
        })?;
        Self::from_json_str(&text)
    }

    pub fn push(&mut self, key: ReactivityKey, value: f64) {
        self.observations.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &ReactivityKey) -> Option<&[f64]> {
        self.observations.get(key).map(Vec::as_slice)
    }

    /// Observations of a base pair: those of the first residue if it has
    /// any, otherwise those of the second.
    pub fn for_base_pair(
        &self,
        motif: &str,
        base_pair_code: &str,
        residues: (i32, i32),
    ) -> Option<&[f64]> {
        let mut bases = base_pair_code.chars();
        let first = bases.next()
            .and_then(|b| self.get(&ReactivityKey::new(motif, b, residues.0)));
        first.or_else(|| {
            bases.next()
                .and_then(|b| self.get(&ReactivityKey::new(motif, b, residues.1)))
        })
    }

    /// Number of residues with observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESIDUES: &str = r#"[
        {"m_sequence": "GAC&GUC", "r_nuc": "G", "pdb_r_pos": 3, "r_data": 0.12},
        {"m_sequence": "GAC&GUC", "r_nuc": "G", "pdb_r_pos": 3, "r_data": 0.15},
        {"m_sequence": "GAC&GUC", "r_nuc": "A", "pdb_r_pos": 4, "r_data": [0.8, 0.9]},
        {"m_sequence": "GAC&GUC", "r_nuc": "C", "pdb_r_pos": 21, "r_data": 0.05}
    ]"#;

    #[test]
    fn test_group_observations() {
        let table = ReactivityTable::from_json_str(RESIDUES).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&ReactivityKey::new("GAC_GUC", 'G', 3)), Some(&[0.12, 0.15][..]));
        assert_eq!(table.get(&ReactivityKey::new("GAC&GUC", 'A', 4)), Some(&[0.8, 0.9][..]));
        assert_eq!(table.get(&ReactivityKey::new("GAC&GUC", 'G', 4)), None);
    }

    #[test]
    fn test_base_pair_lookup_prefers_first_residue() {
        let table = ReactivityTable::from_json_str(RESIDUES).unwrap();
        assert_eq!(table.for_base_pair("GAC_GUC", "GC", (3, 22)), Some(&[0.12, 0.15][..]));
        assert_eq!(table.for_base_pair("GAC_GUC", "UC", (5, 21)), Some(&[0.05][..]));
        assert_eq!(table.for_base_pair("GAC_GUC", "UA", (10, 14)), None);
    }

    #[test]
    fn test_malformed_and_missing_input() {
        assert!(matches!(
            ReactivityTable::from_json_str("{\"not\": \"a list\"}"),
            Err(FeatureError::Json(_))
        ));
        assert!(matches!(
            ReactivityTable::from_json_file("/nonexistent/residues.json"),
            Err(FeatureError::MissingInput(_))
        ));
        assert_eq!(motif_label("GG_CC"), "GG&CC");
    }
}
