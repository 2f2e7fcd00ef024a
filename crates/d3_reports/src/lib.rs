//! Parsers for the text reports of external nucleic-acid analysis tools:
//! DSSR torsion reports and 3DNA base-pair reports.

/// Fixed-column extraction helpers and the section layout macro.
pub mod columns;

/// DSSR torsion report: backbone, pseudo-torsion, pucker and suite tables.
mod torsions;

/// 3DNA base-pair report: identity listing and base-pair parameters.
mod basepairs;

mod error;

pub use error::*;
pub use torsions::*;
pub use basepairs::*;

use std::fs;
use std::io;
use std::path::Path;

/// Reads a whole report, mapping a missing file to [`ReportError::MissingInput`].
pub fn read_report<P: AsRef<Path>>(path: P) -> Result<String, ReportError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReportError::MissingInput(path.to_path_buf()),
        _ => ReportError::Io(e),
    })
}
