use std::fmt;
use std::io;
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ReportError {
    MissingInput(PathBuf),          // report file does not exist
    Io(io::Error),
    FormatMismatch(String),         // an expected marker line is absent or malformed
    CorrelationFailure { identities: usize, geometry_rows: usize },
}

impl ReportError {
    /// True for conditions that should only skip the affected structure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingInput(_) | Self::FormatMismatch(_))
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(path) =>
                write!(f, "File not found: {}", path.display()),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::FormatMismatch(msg) => write!(f, "Unexpected report format: {}", msg),
            Self::CorrelationFailure { identities, geometry_rows } =>
                write!(f, "Report lists {identities} base-pair identities \
                    but {geometry_rows} step-parameter rows"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}
