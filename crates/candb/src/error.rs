//! Conversion error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting a CAN database.
#[derive(Debug, Error)]
pub enum CandbError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line {line}: invalid {what} `{text}`")]
    InvalidNumber {
        line: usize,
        what: &'static str,
        text: String,
    },
}

/// Convenience alias for conversion results.
pub type CandbResult<T> = Result<T, CandbError>;
