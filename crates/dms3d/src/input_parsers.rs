use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result};
use paste::paste;

use d3_reports::TorsionRecord;
use d3_reports::BasePairRecord;
use d3_reports::parse_torsion_report;
use d3_reports::parse_basepair_report;

// ============================================================
//  Base parsers over any buffered reader
// ============================================================

fn read_text<R: BufRead>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Torsion records of one motif instance from a DSSR torsion report.
pub fn read_torsions<R: BufRead>(reader: R, name: &str, motif: &str) -> Result<Vec<TorsionRecord>> {
    let text = read_text(reader)?;
    Ok(parse_torsion_report(&text, name, motif))
}

/// Base-pair records of one structure from a 3DNA report.
pub fn read_basepairs<R: BufRead>(reader: R, name: &str) -> Result<Vec<BasePairRecord>> {
    let text = read_text(reader)?;
    Ok(parse_basepair_report(&text, name)?)
}

// ============================================================
//  Macro generating file/string/stdin/input helpers
// ============================================================

/// Generate input adapters for a base parser function
/// `fn base<R: BufRead>(R, args...) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str, args...)`
/// - `base_file<P: AsRef<Path>>(P, args...)`
/// - `base_stdin(args...)`
/// - `base_input(&str, args...)`  (dispatches "-" → stdin, otherwise → file)
///
/// Example:
/// ```ignore
/// define_input_variants!(read_basepairs(name: &str), Result<Vec<BasePairRecord>>);
/// ```
macro_rules! define_input_variants {
    ($base:ident($($arg:ident: $ty:ty),*), $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str, $($arg: $ty),*) -> $ret {
                $base(Cursor::new(s), $($arg),*)
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P, $($arg: $ty),*) -> $ret {
                let path = path.as_ref();
                let file = File::open(path)
                    .with_context(|| format!("File not found: {}", path.display()))?;
                $base(BufReader::new(file), $($arg),*)
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]($($arg: $ty),*) -> $ret {
                let reader = BufReader::new(stdin());
                $base(reader, $($arg),*)
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str, $($arg: $ty),*) -> $ret {
                if s == "-" {
                    [<$base _stdin>]($($arg),*)
                } else {
                    [<$base _file>](s, $($arg),*)
                }
            }
        }
    };
}

// ============================================================
//  Apply macro to generate adapters for both reports
// ============================================================

type TorsionResult = Result<Vec<TorsionRecord>>;
type BasePairResult = Result<Vec<BasePairRecord>>;

define_input_variants!(read_torsions(name: &str, motif: &str), TorsionResult);
define_input_variants!(read_basepairs(name: &str), BasePairResult);

/// The structure name of a report file: its stem without the tool suffix
/// (`construct_1_x3dna.out` -> `construct_1`).
pub fn structure_name(path: &str, suffix: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("anonymous");
    stem.strip_suffix(suffix).unwrap_or(stem).to_string()
}

// ============================================================
//  Unit tests
// ============================================================
