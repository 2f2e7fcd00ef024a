//! Rigid superposition of paired point sets and the RMSD of experimental
//! base pairs to idealized base-pair geometry.

/// Least-squares rotation (Kabsch), superposition and RMSD.
pub mod superposition;

/// Base, BasePairCode and the canonical atoms of each base.
mod bases;

/// Atom coordinates read from PDB files.
mod pdb;

/// Reference structures of ideal base pairs.
mod ideal;

mod rmsd;
mod error;

pub use bases::*;
pub use pdb::*;
pub use ideal::*;
pub use rmsd::*;
pub use error::*;
pub use superposition::{compute_optimal_rotation, superimpose, aligned_rmsd};
