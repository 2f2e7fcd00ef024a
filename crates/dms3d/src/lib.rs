//! # dms3d
//!
//! Unified API for extracting structural features of RNA motifs from DSSR
//! and 3DNA reports and atomic coordinates.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod input_parsers;
pub mod dataset_parsers;
pub mod output;

pub mod reports {
    pub use ::d3_reports::*;
}

pub mod geometry {
    pub use ::d3_geometry::*;
}

pub mod features {
    pub use ::d3_features::*;
}

use std::io::Write;
use env_logger::Builder;

/// Sets up logging for the binaries: 0 = warn, 1 = info, 2+ = debug.
/// `RUST_LOG` takes precedence.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            // no prefix, just the message
            writeln!(buf, "{}", record.args())
        })
        .init();
}
