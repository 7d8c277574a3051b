//! Errors raised at the parameter persistence boundary.

use thiserror::Error;

/// Failure to read a parameter map or parameter file.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// A required key is absent
    #[error("missing parameter: {0}")]
    Missing(String),

    /// The key exists but holds a different kind of value
    #[error("parameter {key} is not a {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("parameter {key} has unknown unit '{unit}'")]
    UnknownUnit { key: String, unit: String },

    #[error("unknown bands region '{0}'")]
    UnknownRegion(String),

    /// No bundled detector has this class name
    #[error("unknown detector class '{0}'")]
    UnknownDetector(String),

    /// An alert level references a detector identifier with no definition
    #[error("alert level {level} references undefined detector '{id}'")]
    UndefinedDetector { level: usize, id: String },

    #[error("parameter file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameter file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
