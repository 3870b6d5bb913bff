use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Resource file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Failed to read resource file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write resource file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Resource file '{0}' is empty")]
    Empty(PathBuf),

    #[error("Resource file '{0}' has no data rows")]
    NoRows(PathBuf),

    #[error("Malformed header in '{path}' at line {line}: {message}")]
    MalformedHeader {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Required field '{field}' missing from '{path}'")]
    MissingField { path: PathBuf, field: String },

    #[error("Unknown wind field '{field}' in '{path}'")]
    UnknownField { path: PathBuf, field: String },

    #[error("Missing or non-numeric value in column '{column}' at row {row} of '{path}'")]
    InvalidValue {
        path: PathBuf,
        column: String,
        row: usize,
    },

    #[error("'{path}': {what} has {found} entries, expected {expected}")]
    LengthMismatch {
        path: PathBuf,
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("CSV parsing failed for '{0}'")]
    Csv(PathBuf, #[source] PolarsError),
}
