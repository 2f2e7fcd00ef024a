use std::fmt;
use std::io;
use std::error::Error;
use std::path::PathBuf;

use d3_reports::ReportError;
use d3_geometry::GeometryError;

#[derive(Debug)]
pub enum FeatureError {
    Report(ReportError),
    Geometry(GeometryError),
    Json(serde_json::Error),
    MissingInput(PathBuf),
    Io(io::Error),
}

impl FeatureError {
    /// True for failures that only concern the structure at hand.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Report(e) => e.is_recoverable(),
            Self::Geometry(GeometryError::MissingInput(_)) => true,
            Self::MissingInput(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report(e) => write!(f, "{}", e),
            Self::Geometry(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::MissingInput(path) => write!(f, "File not found: {}", path.display()),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for FeatureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Report(e) => Some(e),
            Self::Geometry(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::MissingInput(_) => None,
        }
    }
}

impl From<ReportError> for FeatureError {
    fn from(e: ReportError) -> Self { Self::Report(e) }
}

impl From<GeometryError> for FeatureError {
    fn from(e: GeometryError) -> Self { Self::Geometry(e) }
}

impl From<serde_json::Error> for FeatureError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}

impl From<io::Error> for FeatureError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}
