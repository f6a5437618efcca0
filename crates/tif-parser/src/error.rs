//! Parser error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Error)]
pub enum ParserError {
    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Frontmatter parsing failed
    #[error("Frontmatter parse error: {0}")]
    Frontmatter(String),

    /// File exceeds size limit
    #[error("File too large: {size} bytes (max {max} bytes)")]
    FileTooLarge {
        /// Actual file size
        size: u64,
        /// Maximum allowed size
        max: u64,
    },

    /// File content is not valid UTF-8
    #[error("Invalid UTF-8 encoding in {0}")]
    Encoding(PathBuf),
}

/// Specialized Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;

impl ParserError {
    /// Create a frontmatter error
    pub fn frontmatter(msg: impl Into<String>) -> Self {
        Self::Frontmatter(msg.into())
    }
}
