//! Atom coordinates from PDB coordinate files.
//!
//! Only what base-pair superposition needs is read: residue sequence number,
//! atom name and the orthogonal coordinates of every ATOM record of the
//! first model. HETATM records (ligands, waters) are not read.

use std::fs;
use std::io;
use std::path::Path;

use ahash::AHashMap;
use log::debug;
use nalgebra::Point3;

use crate::GeometryError;

/// Atom coordinates keyed by residue sequence number, then atom name.
#[derive(Debug, Clone, Default)]
pub struct AtomTable {
    residues: AHashMap<i32, AHashMap<String, Point3<f64>>>,
}

fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, start: usize, end: usize, lnum: usize) -> Result<f64, GeometryError> {
    let text = field(line, start, end);
    text.parse().map_err(|_| GeometryError::InvalidAtomRecord {
        line: lnum,
        reason: format!("bad coordinate '{}' in columns {}-{}", text, start + 1, end),
    })
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the ATOM records of a PDB file's first model.
    ///
    /// Alternate locations and repeated atom names keep the first
    /// occurrence.
    pub fn from_pdb_str(text: &str) -> Result<Self, GeometryError> {
        let mut table = AtomTable::new();
        for (i, line) in text.lines().enumerate() {
            let lnum = i + 1;
            if line.starts_with("ENDMDL") {
                break;
            }
            if !line.starts_with("ATOM") {
                continue;
            }
            if line.len() < 54 {
                return Err(GeometryError::InvalidAtomRecord {
                    line: lnum,
                    reason: format!("record too short ({} columns)", line.len()),
                });
            }

            let name = field(line, 12, 16);
            let res_seq = field(line, 22, 26);
            let res_seq: i32 = res_seq.parse().map_err(|_| GeometryError::InvalidAtomRecord {
                line: lnum,
                reason: format!("bad residue number '{}'", res_seq),
            })?;
            let x = parse_coordinate(line, 30, 38, lnum)?;
            let y = parse_coordinate(line, 38, 46, lnum)?;
            let z = parse_coordinate(line, 46, 54, lnum)?;

            table.residues
                .entry(res_seq)
                .or_default()
                .entry(name.to_string())
                .or_insert(Point3::new(x, y, z));
        }
        debug!("Read {} residues from coordinate records.", table.len());
        Ok(table)
    }

    pub fn from_pdb_file<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GeometryError::MissingInput(path.to_path_buf()),
            _ => GeometryError::Io(e),
        })?;
        Self::from_pdb_str(&text)
    }

    /// Sets an atom position, replacing any previous one.
    pub fn insert(&mut self, residue: i32, atom: &str, position: Point3<f64>) {
        self.residues
            .entry(residue)
            .or_default()
            .insert(atom.to_string(), position);
    }

    pub fn get(&self, residue: i32, atom: &str) -> Option<&Point3<f64>> {
        self.residues.get(&residue)?.get(atom)
    }

    pub fn has_residue(&self, residue: i32) -> bool {
        self.residues.contains_key(&residue)
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
