use std::path::Path;

use ahash::AHashMap;
use colored::*;
use log::{info, warn};

use crate::AtomTable;
use crate::BasePairCode;
use crate::GeometryError;

/// Idealized single-base-pair reference structures, one per base-pair code.
///
/// Each reference holds the first base in residue slot 1 and the second
/// base in residue slot 2. The library is read-only once loaded and can be
/// shared by reference across worker threads.
#[derive(Debug, Clone, Default)]
pub struct IdealLibrary {
    references: AHashMap<BasePairCode, AtomTable>,
}

impl IdealLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `<dir>/<CODE>.pdb` for every requested code.
    ///
    /// Codes without a reference file are skipped with a warning, base
    /// pairs of that type then have no RMSD.
    pub fn load_codes<P, I>(dir: P, codes: I) -> Result<Self, GeometryError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = BasePairCode>,
    {
        let dir = dir.as_ref();
        let mut library = IdealLibrary::new();
        for code in codes {
            let path = dir.join(format!("{}.pdb", code));
            match AtomTable::from_pdb_file(&path) {
                Ok(table) => library.insert(code, table),
                Err(GeometryError::MissingInput(p)) => {
                    warn!("{} no ideal reference for {} at {}.",
                        "WARNING:".red(), code, p.display());
                }
                Err(e) => return Err(e),
            }
        }
        info!("Loaded {} ideal base-pair references from {}.", library.len(), dir.display());
        Ok(library)
    }

    /// Loads whatever references exist for the sixteen base combinations.
    pub fn load_all<P: AsRef<Path>>(dir: P) -> Result<Self, GeometryError> {
        Self::load_codes(dir, BasePairCode::all())
    }

    pub fn insert(&mut self, code: BasePairCode, table: AtomTable) {
        self.references.insert(code, table);
    }

    pub fn get(&self, code: &BasePairCode) -> Option<&AtomTable> {
        self.references.get(code)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
