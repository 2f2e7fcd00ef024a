use log::debug;
use nalgebra::Point3;

use crate::AtomTable;
use crate::Base;
use crate::BasePairCode;
use crate::GeometryError;
use crate::superposition::aligned_rmsd;

/// Residue slots of the two bases in an idealized reference structure.
pub const IDEAL_SLOTS: (i32, i32) = (1, 2);

/// Collects `(ideal, experimental)` coordinate pairs of one base's canonical
/// atoms, skipping atoms missing from either structure.
fn matched_atoms(
    base: Base,
    ideal: &AtomTable,
    ideal_residue: i32,
    experimental: &AtomTable,
    residue: i32,
    ideal_points: &mut Vec<Point3<f64>>,
    experimental_points: &mut Vec<Point3<f64>>,
) {
    for atom in base.canonical_atoms() {
        match (ideal.get(ideal_residue, atom), experimental.get(residue, atom)) {
            (Some(i), Some(e)) => {
                ideal_points.push(*i);
                experimental_points.push(*e);
            }
            _ => debug!("Atom {} of {}{} not in both structures.", atom, base, residue),
        }
    }
}

/// RMSD between a base pair of the experimental structure and the ideal
/// geometry of its type, after optimal superposition.
///
/// Only canonical base atoms present in both structures contribute.
/// Returns `Ok(None)` when no atom matches, or when the code names a base
/// without canonical atoms, which is distinct from a perfect fit. One or
/// two matched atoms still give a value.
pub fn rmsd_for_base_pair(
    base_pair_code: &str,
    ideal: &AtomTable,
    experimental: &AtomTable,
    residue_indices: (i32, i32),
) -> Result<Option<f64>, GeometryError> {
    let Ok(BasePairCode(b1, b2)) = BasePairCode::try_from(base_pair_code) else {
        debug!("No canonical atoms for base pair {}.", base_pair_code);
        return Ok(None);
    };

    let mut ideal_points = Vec::new();
    let mut experimental_points = Vec::new();
    matched_atoms(b1, ideal, IDEAL_SLOTS.0, experimental, residue_indices.0,
        &mut ideal_points, &mut experimental_points);
    matched_atoms(b2, ideal, IDEAL_SLOTS.1, experimental, residue_indices.1,
        &mut ideal_points, &mut experimental_points);

    if ideal_points.is_empty() {
        debug!("No matching atoms for {} at {:?}.", base_pair_code, residue_indices);
        return Ok(None);
    }
    aligned_rmsd(&experimental_points, &ideal_points).map(Some)
}
