//! Error types for vault conversion

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tif_parser::ParserError;

/// Conversion error type
///
/// Every variant is fatal for the run; the partially written output file is
/// left on disk and must not be treated as valid.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// IO error on a known path
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// IO error while appending to the output stream
    #[error("Output write error: {0}")]
    Write(#[from] io::Error),

    /// Directory enumeration failed
    #[error("Vault traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A note could not be parsed
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    /// Node serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Container open/close events did not nest
    #[error("Scope error: {0}")]
    Scope(String),

    /// Vault root is not a usable directory
    #[error("Invalid vault path: {0}")]
    InvalidPath(String),
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a scope discipline error
    pub fn scope(msg: impl Into<String>) -> Self {
        Self::Scope(msg.into())
    }
}
