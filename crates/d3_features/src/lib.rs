//! Base-pair features of RNA motif structures: RMSD to ideal geometry,
//! flanking-pair flags and the join with per-residue reactivity.

/// Flanking-pair classification from motif residue numbering.
pub mod flanking;

/// Reactivity observations keyed by motif, nucleotide and residue.
pub mod reactivity;

mod assembly;
mod batch;
mod error;

pub use assembly::*;
pub use batch::*;
pub use error::*;
pub use flanking::is_flanking_pair;
pub use reactivity::ReactivityTable;
