//! Parser for 3DNA `analyze` base-pair reports (`<name>_x3dna.out`).
//!
//! Two regions of the report describe the same base pairs in the same order:
//! the identity listing (residue numbers and pairing notation) and the local
//! base-pair parameter table (shear ... opening). They are read by two
//! independent passes and joined by position.

use std::fmt;
use std::path::Path;
use log::debug;
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};

use crate::ReportError;
use crate::read_report;

/// `1 (0.008) ....>-:...3_:[..G]G-----C[..C]:..22_:-<.... (0.010)`
static IDENTITY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\s*(\d*)\s*\((.*?)\)\s+.*?(\d+)_:\[\.\.(.)\](.)[-A-Z\*\+\-]+[A-Z]+\[\.\.(.)\]:\.*(\d+)_:-<.*?\((.*?)\)",
    ).expect("valid identity pattern")
});

/// `1 G-C   -0.21   -0.13   -0.08   -2.81   -9.19   -1.41`
static GEOMETRY_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\s*(\d*)\s*([A-Z]\+[A-Z]|[A-Z]-[A-Z])\s+",
        r"([-]?\d+\.\d+)\s+([-]?\d+\.\d+)\s+([-]?\d+\.\d+)\s+",
        r"([-]?\d+\.\d+)\s+([-]?\d+\.\d+)\s+([-]?\d+\.\d+)",
    )).expect("valid geometry pattern")
});

/// Column labels of the local base-pair parameter table header.
pub const GEOMETRY_HEADER: [&str; 6] = ["Shear", "Stretch", "Stagger", "Buckle", "Propeller", "Opening"];

/// Marks the line naming the analysed structure; its path carries the motif.
pub const FILE_NAME_MARKER: &str = "File name:";

/// Canonical (Watson-Crick) hydrogen bonding in the identity listing.
pub const WC_BOND_MARKER: &str = "-----";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairType {
    #[serde(rename = "WC")]
    WatsonCrick,
    #[serde(rename = "NON-WC")]
    NonWatsonCrick,
}

impl fmt::Display for PairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairType::WatsonCrick => write!(f, "WC"),
            PairType::NonWatsonCrick => write!(f, "NON-WC"),
        }
    }
}

/// Pairing class and residue numbers of one listed base pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIdentity {
    pub pair_type: PairType,
    pub residue_index_1: i32,
    pub residue_index_2: i32,
}

/// The six local base-pair parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepParameters {
    pub shear: f64,
    pub stretch: f64,
    pub stagger: f64,
    pub buckle: f64,
    pub propeller: f64,
    pub opening: f64,
}

/// One row of the base-pair parameter table.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRow {
    pub motif_id: String,
    pub base_pair_code: String,
    pub parameters: StepParameters,
}

/// One base pair of one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePairRecord {
    #[serde(rename = "name")]
    pub structure_name: String,
    #[serde(rename = "motif")]
    pub motif_id: String,
    #[serde(rename = "r_type")]
    pub pair_type: PairType,
    #[serde(rename = "res_num1")]
    pub residue_index_1: i32,
    #[serde(rename = "res_num2")]
    pub residue_index_2: i32,
    #[serde(rename = "bp")]
    pub base_pair_code: String,
    #[serde(flatten)]
    pub parameters: StepParameters,
}

impl BasePairRecord {
    pub const COLUMNS: [&'static str; 12] = [
        "name", "motif", "r_type", "res_num1", "res_num2", "bp",
        "shear", "stretch", "stagger", "buckle", "propeller", "opening",
    ];

    pub fn is_watson_crick(&self) -> bool {
        self.pair_type == PairType::WatsonCrick
    }
}

/// Drops the bond-type separator of a pair token: `G-C` -> `GC`, `A+U` -> `AU`.
pub fn base_pair_code(token: &str) -> String {
    token.split(['-', '+']).take(2).collect()
}

fn is_geometry_header(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.windows(GEOMETRY_HEADER.len()).any(|w| *w == GEOMETRY_HEADER)
}

fn motif_from_file_line(line: &str) -> Option<&str> {
    line.split('/').nth(2).map(str::trim).filter(|m| !m.is_empty())
}

/// Pass A: every base-pair listing line, in report order.
///
/// Lines that do not carry a pairing notation are skipped.
pub fn extract_identities(text: &str) -> Vec<PairIdentity> {
    text.lines()
        .filter_map(|line| {
            let caps = IDENTITY_LINE.captures(line)?;
            let residue_index_1 = caps[3].parse().ok()?;
            let residue_index_2 = caps[7].parse().ok()?;
            let pair_type = if line.contains(WC_BOND_MARKER) {
                PairType::WatsonCrick
            } else {
                PairType::NonWatsonCrick
            };
            Some(PairIdentity { pair_type, residue_index_1, residue_index_2 })
        })
        .collect()
}

/// Pass B: the rows of the first base-pair parameter table.
///
/// The table starts after its header line and ends at the first line that
/// is not a parameter row. Each row takes its motif from the most recent
/// `File name:` line.
pub fn extract_geometry(text: &str) -> Result<Vec<GeometryRow>, ReportError> {
    let mut in_table = false;
    let mut file_line: Option<&str> = None;
    let mut rows = Vec::new();

    for line in text.lines() {
        if !in_table && is_geometry_header(line) {
            in_table = true;
            continue;
        }
        if line.starts_with(FILE_NAME_MARKER) {
            file_line = Some(line);
        }
        if !in_table {
            continue;
        }
        let Some(caps) = GEOMETRY_ROW.captures(line) else {
            break;
        };

        let motif_id = file_line
            .and_then(motif_from_file_line)
            .ok_or_else(|| ReportError::FormatMismatch(format!(
                "no motif path on a '{}' line before parameter row {:?}",
                FILE_NAME_MARKER,
                line.trim()
            )))?;

        // The pattern guarantees well-formed decimals.
        let value = |i: usize| caps[i].parse::<f64>().unwrap_or(f64::NAN);
        rows.push(GeometryRow {
            motif_id: motif_id.to_owned(),
            base_pair_code: base_pair_code(&caps[2]),
            parameters: StepParameters {
                shear: value(3),
                stretch: value(4),
                stagger: value(5),
                buckle: value(6),
                propeller: value(7),
                opening: value(8),
            },
        });
    }
    debug!("Found {} base-pair parameter rows.", rows.len());
    Ok(rows)
}

/// Parses a 3DNA base-pair report into one record per base pair.
///
/// Both passes must list the same number of base pairs; otherwise geometry
/// would be attributed to the wrong residues and
/// [`ReportError::CorrelationFailure`] is returned.
pub fn parse_basepair_report(text: &str, structure_name: &str) -> Result<Vec<BasePairRecord>, ReportError> {
    let identities = extract_identities(text);
    let rows = extract_geometry(text)?;
    if identities.len() != rows.len() {
        return Err(ReportError::CorrelationFailure {
            identities: identities.len(),
            geometry_rows: rows.len(),
        });
    }

    Ok(identities.into_iter().zip(rows).map(|(id, row)| BasePairRecord {
        structure_name: structure_name.to_owned(),
        motif_id: row.motif_id,
        pair_type: id.pair_type,
        residue_index_1: id.residue_index_1,
        residue_index_2: id.residue_index_2,
        base_pair_code: row.base_pair_code,
        parameters: row.parameters,
    }).collect())
}

/// Reads and parses a base-pair report file.
pub fn parse_basepair_file<P: AsRef<Path>>(
    path: P,
    structure_name: &str,
) -> Result<Vec<BasePairRecord>, ReportError> {
    let text = read_report(path)?;
    parse_basepair_report(&text, structure_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
    3DNA v2.4-2023feb03, created and maintained by Xiang-Jun Lu (PhD)
****************************************************************************
File name: data/pdbs/GAC_GUC/TWOWAY.1GID.2.pdb
Date and time: Mon Jun 10 11:21:43 2024

Number of base-pairs: 4
Number of atoms: 520
****************************************************************************
RMSD of the bases (----- for WC bp, + for isolated bp, x for helix change)

            Strand I                    Strand II          Helix
   1   (0.008) ....>-:...3_:[..G]G-----C[..C]:..22_:-<....  (0.010)     |
   2   (0.012) ....>-:...4_:[..G]G-----C[..C]:..21_:-<....  (0.009)     |
   3   (0.015) ....>-:...5_:[..A]A-**+-G[..G]:..19_:-<....  (0.011)     |
   4   (0.009) ....>-:..10_:[..U]U-----A[..A]:..14_:-<....  (0.014)     |
****************************************************************************
Local base-pair parameters
     bp        Shear    Stretch   Stagger    Buckle  Propeller  Opening
     1 G-C      -0.21     -0.13     -0.08     -2.81     -9.19     -1.41
     2 G-C      -0.35     -0.17      0.12      4.02    -12.83      0.66
     3 A+G       6.71     -4.48     -0.22     12.10     -8.20    -96.30
     4 U-A       0.05     -0.10      0.31     -1.20     -5.01      2.44
          ave.     1.55     -1.22      0.03      3.03     -8.81    -23.65
          s.d.     3.44      2.17      0.20      6.38      3.26     49.09
****************************************************************************
Local base-pair step parameters
    step       Shift     Slide      Rise      Tilt      Roll     Twist
";

    #[test]
    fn test_base_pair_code() {
        assert_eq!(base_pair_code("G-C"), "GC");
        assert_eq!(base_pair_code("A+U"), "AU");
    }

    #[test]
    fn test_extract_identities() {
        let ids = extract_identities(REPORT);
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], PairIdentity {
            pair_type: PairType::WatsonCrick,
            residue_index_1: 3,
            residue_index_2: 22,
        });
        assert_eq!(ids[2].pair_type, PairType::NonWatsonCrick);
        assert_eq!((ids[2].residue_index_1, ids[2].residue_index_2), (5, 19));
        assert_eq!((ids[3].residue_index_1, ids[3].residue_index_2), (10, 14));
    }

    #[test]
    fn test_extract_geometry_stops_at_first_mismatch() {
        let rows = extract_geometry(REPORT).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].motif_id, "GAC_GUC");
        assert_eq!(rows[0].base_pair_code, "GC");
        assert_eq!(rows[0].parameters, StepParameters {
            shear: -0.21,
            stretch: -0.13,
            stagger: -0.08,
            buckle: -2.81,
            propeller: -9.19,
            opening: -1.41,
        });
        assert_eq!(rows[2].base_pair_code, "AG");
        assert_eq!(rows[2].parameters.opening, -96.30);
        assert_eq!(rows[3].base_pair_code, "UA");
    }

    #[test]
    fn test_parse_basepair_report() {
        let records = parse_basepair_report(REPORT, "TWOWAY.1GID.2").unwrap();
        assert_eq!(records.len(), 4);
        let first = &records[0];
        assert_eq!(first.structure_name, "TWOWAY.1GID.2");
        assert_eq!(first.motif_id, "GAC_GUC");
        assert!(first.is_watson_crick());
        assert_eq!((first.residue_index_1, first.residue_index_2), (3, 22));
        assert_eq!(first.base_pair_code, "GC");
        assert!(!records[2].is_watson_crick());
        assert_eq!(records[2].base_pair_code, "AG");
        assert_eq!(records.iter().filter(|r| r.is_watson_crick()).count(), 3);
    }

    #[test]
    fn test_no_table_yields_no_records() {
        let text = "File name: a/b/GG_CC/x.pdb\nnothing else\n";
        assert!(parse_basepair_report(text, "x").unwrap().is_empty());
    }

    #[test]
    fn test_correlation_failure() {
        // Drop one identity line: the geometry table now has a row too many.
        let text: String = REPORT
            .lines()
            .filter(|l| !l.contains("..10_:"))
            .map(|l| format!("{}\n", l))
            .collect();
        let res = parse_basepair_report(&text, "x");
        assert!(matches!(res,
            Err(ReportError::CorrelationFailure { identities: 3, geometry_rows: 4 })));
    }

    #[test]
    fn test_missing_motif_line() {
        let text: String = REPORT
            .lines()
            .filter(|l| !l.starts_with(FILE_NAME_MARKER))
            .map(|l| format!("{}\n", l))
            .collect();
        let res = extract_geometry(&text);
        assert!(matches!(res, Err(ReportError::FormatMismatch(_))));
    }

    #[test]
    fn test_serialized_columns() {
        let records = parse_basepair_report(REPORT, "x").unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["r_type"], "WC");
        assert_eq!(json["bp"], "GC");
        assert_eq!(json["res_num2"], 22);
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), BasePairRecord::COLUMNS.len());
        for name in BasePairRecord::COLUMNS {
            assert!(object.contains_key(name), "missing column {}", name);
        }
    }
}
