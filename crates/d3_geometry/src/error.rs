use std::fmt;
use std::io;
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GeometryError {
    LengthMismatch { mobile: usize, target: usize },
    EmptyPointSet,
    Degenerate { rank: usize },         // covariance rank < 2: rotation undefined
    MissingInput(PathBuf),
    Io(io::Error),
    InvalidAtomRecord { line: usize, reason: String },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { mobile, target } =>
                write!(f, "Point sets differ in size: {mobile} mobile vs {target} target"),
            Self::EmptyPointSet => write!(f, "Cannot superimpose empty point sets"),
            Self::Degenerate { rank } =>
                write!(f, "Degenerate point sets (covariance rank {rank}), rotation is undefined"),
            Self::MissingInput(path) => write!(f, "File not found: {}", path.display()),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidAtomRecord { line, reason } =>
                write!(f, "Invalid atom record on line {line}: {reason}"),
        }
    }
}

impl Error for GeometryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GeometryError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}
