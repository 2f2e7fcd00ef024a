//! Parser for DSSR torsion reports (`dssr-torsions.txt`).
//!
//! The report holds four independently positioned tables, each introduced by
//! a header line that mentions `nt` and a section keyword. Data rows follow
//! the header directly, one per nucleotide, and every field sits at a fixed
//! character range. The layouts below describe the DSSR v2 torsion report;
//! a change of the upstream layout is an edit of these tables only.

use std::path::Path;
use log::warn;
use colored::*;
use serde::{Serialize, Deserialize};

use crate::ReportError;
use crate::read_report;
use crate::columns::Column;
use crate::columns::FieldKind;
use crate::columns::ReportSection;
use crate::columns::report_section;

/// Single-letter nucleotide code, read from the backbone section.
pub const NT_COLUMN: Column = Column::new("r_nuc", 8, 9, FieldKind::Token);

/// Residue number of the nucleotide, read from the backbone section.
pub const NT_NUM_COLUMN: Column = Column::new("nt_num", 9, 11, FieldKind::Token);

report_section! {
    /// Backbone torsions and sugar descriptors (header keyword `alpha`).
    BackboneTorsions, keyword = "alpha" {
        alpha:       Decimal [26, 32],
        beta:        Decimal [33, 40],
        gamma:       Decimal [42, 48],
        delta:       Decimal [51, 56],
        epsilon:     Decimal [57, 65],
        zeta:        Decimal [66, 73],
        e_z:         Decimal [75, 83] as "e-z",
        chi:         Token   [85, 98],
        phase_angle: Token   [101, 116] as "phase-angle",
        sugar_type:  Token   [117, 127] as "sugar-type",
        sszp:        Decimal [130, 135],
        dp:          Decimal [138, 143],
        splay:       Decimal [145, 151],
    }
}

report_section! {
    /// Pseudo-torsions (header keyword `eta`).
    PseudoTorsions, keyword = "eta" {
        eta:     Decimal [25, 33],
        theta:   Decimal [33, 41],
        eta_1:   Decimal [41, 48],
        theta_1: Decimal [49, 56],
        eta_2:   Decimal [57, 64],
        theta_2: Decimal [65, 73],
    }
}

report_section! {
    /// Sugar pucker amplitudes (header keyword `v0`).
    SugarPucker, keyword = "v0" {
        v0:        Decimal [27, 33],
        v1:        Decimal [34, 41],
        v2:        Decimal [43, 49],
        v3:        Decimal [50, 57],
        v4:        Decimal [59, 64],
        tm:        Decimal [67, 72],
        p:         Decimal [75, 80],
        puckering: Token   [81, 90],
    }
}

report_section! {
    /// Suite bin classification (header keyword `bin`).
    SuiteBin, keyword = "bin" {
        bin:      Token   [24, 31],
        cluster:  Token   [33, 38],
        suitness: Decimal [42, 53],
    }
}

/// One nucleotide position of one motif instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorsionRecord {
    #[serde(rename = "pdb_name")]
    pub structure_name: String,
    #[serde(rename = "m_sequence")]
    pub motif_id: String,
    /// 1-based position within the motif (the report row, not a parsed value).
    #[serde(rename = "r_loc_pos")]
    pub sequence_position: usize,
    #[serde(rename = "r_nuc")]
    pub nucleotide: Option<char>,
    pub nt_num: Option<String>,
    #[serde(flatten)]
    pub backbone: BackboneTorsions,
    #[serde(flatten)]
    pub pseudo: PseudoTorsions,
    #[serde(flatten)]
    pub pucker: SugarPucker,
    #[serde(flatten)]
    pub suite: SuiteBin,
}

impl TorsionRecord {
    /// All output column names, in serialization order.
    pub fn columns() -> Vec<&'static str> {
        let mut names = vec!["pdb_name", "m_sequence", "r_loc_pos", NT_COLUMN.name, NT_NUM_COLUMN.name];
        for section in [
            BackboneTorsions::COLUMNS,
            PseudoTorsions::COLUMNS,
            SugarPucker::COLUMNS,
            SuiteBin::COLUMNS,
        ] {
            names.extend(section.iter().map(|c| c.name));
        }
        names
    }
}

/// Line index of the first data row of each section (the line after its
/// header), or `None` if the section header was not found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SectionOffsets {
    pub backbone: Option<usize>,
    pub pseudo: Option<usize>,
    pub pucker: Option<usize>,
    pub suite: Option<usize>,
}

impl SectionOffsets {
    /// Scans the report once. A header line must contain `nt`; its section
    /// is the first of `alpha`, `eta`, `v0`, `bin` it mentions. When a header
    /// repeats, the last one wins.
    pub fn locate(lines: &[&str]) -> Self {
        let mut offsets = SectionOffsets::default();
        for (idx, line) in lines.iter().enumerate() {
            if !line.contains("nt") {
                continue;
            }
            let slot = if line.contains(BackboneTorsions::KEYWORD) {
                &mut offsets.backbone
            } else if line.contains(PseudoTorsions::KEYWORD) {
                &mut offsets.pseudo
            } else if line.contains(SugarPucker::KEYWORD) {
                &mut offsets.pucker
            } else if line.contains(SuiteBin::KEYWORD) {
                &mut offsets.suite
            } else {
                continue;
            };
            *slot = Some(idx + 1);
        }
        offsets
    }

    pub fn is_empty(&self) -> bool {
        self.backbone.is_none()
            && self.pseudo.is_none()
            && self.pucker.is_none()
            && self.suite.is_none()
    }
}

/// The data line of row `row` in a section, if the section exists and the
/// line lies within the report.
fn section_line<'a>(lines: &[&'a str], offset: Option<usize>, row: usize) -> Option<&'a str> {
    offset.and_then(|start| lines.get(start + row)).copied()
}

fn read_section<S: ReportSection>(lines: &[&str], offset: Option<usize>, row: usize) -> S {
    section_line(lines, offset, row)
        .map(S::from_line)
        .unwrap_or_default()
}

/// Parses a DSSR torsion report for one motif instance.
///
/// Exactly `len(motif_id) - 1` records are returned (counting the strand
/// separator), whatever the report contains: missing sections and rows past
/// the end of the report yield absent fields.
pub fn parse_torsion_report(text: &str, structure_name: &str, motif_id: &str) -> Vec<TorsionRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let offsets = SectionOffsets::locate(&lines);
    if offsets.is_empty() {
        warn!("{} No torsion sections found in report for {}.", "WARNING:".red(), structure_name);
    }

    let rows = motif_id.chars().count().saturating_sub(1);
    (0..rows).map(|i| {
        let backbone_line = section_line(&lines, offsets.backbone, i);
        TorsionRecord {
            structure_name: structure_name.to_owned(),
            motif_id: motif_id.to_owned(),
            sequence_position: i + 1,
            nucleotide: backbone_line
                .and_then(|l| NT_COLUMN.text(l))
                .and_then(|t| t.chars().next()),
            nt_num: backbone_line
                .and_then(|l| NT_NUM_COLUMN.text(l))
                .map(str::to_owned),
            backbone: read_section(&lines, offsets.backbone, i),
            pseudo: read_section(&lines, offsets.pseudo, i),
            pucker: read_section(&lines, offsets.pucker, i),
            suite: read_section(&lines, offsets.suite, i),
        }
    }).collect()
}

/// Reads and parses a torsion report file.
///
/// A missing file is reported as [`ReportError::MissingInput`], which callers
/// processing many structures should treat as "no records".
pub fn parse_torsion_file<P: AsRef<Path>>(
    path: P,
    structure_name: &str,
    motif_id: &str,
) -> Result<Vec<TorsionRecord>, ReportError> {
    let text = read_report(path)?;
    Ok(parse_torsion_report(&text, structure_name, motif_id))
}
