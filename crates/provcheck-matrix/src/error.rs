use std::path::PathBuf;
use thiserror::Error;

/// Errors from parsing a dotted field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path has no segments
    #[error("Field path is empty")]
    Empty,

    /// A segment between two dots is empty
    #[error("Empty segment at position {position} in field path '{path}'")]
    EmptySegment { path: String, position: usize },
}

/// Errors from loading provider test data
#[derive(Error, Debug)]
pub enum DataError {
    /// Errors reading the document from disk
    #[error("Failed to read test data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document could not be represented as JSON (e.g. non-string keys)
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level of the document is not a mapping
    #[error("Test data must be a mapping at the top level, found {0}")]
    InvalidDocument(String),

    /// The `providers` section has an unexpected shape
    #[error("Invalid providers section: {0}")]
    InvalidProviders(String),
}

/// Errors reported by the matrix runner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// At least one parameter set failed
    #[error("{name}: {} of {total} cases failed ({})", .failed.len(), .failed.join(", "))]
    CasesFailed {
        name: String,
        total: usize,
        failed: Vec<String>,
    },
}
