//! Note parser entry points

use std::path::Path;
use tracing::trace;

use crate::error::{ParserError, ParserResult};
use crate::frontmatter::extract_frontmatter;
use crate::outline::parse_outline;
use crate::types::ParsedNote;

/// Default size limit for a single note
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Markdown parser for vault notes
#[derive(Debug, Clone)]
pub struct NoteParser {
    max_file_size: Option<u64>,
}

impl NoteParser {
    /// Create a parser with the default size limit
    pub fn new() -> Self {
        Self {
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }

    /// Override the size limit; `None` disables it
    pub fn with_max_file_size(mut self, max: Option<u64>) -> Self {
        self.max_file_size = max;
        self
    }

    /// Read and parse a note from disk
    pub fn parse_file(&self, path: &Path) -> ParserResult<ParsedNote> {
        if let Some(max) = self.max_file_size {
            let size = std::fs::metadata(path)?.len();
            if size > max {
                return Err(ParserError::FileTooLarge { size, max });
            }
        }

        let bytes = std::fs::read(path)?;
        let content =
            String::from_utf8(bytes).map_err(|_| ParserError::Encoding(path.to_path_buf()))?;
        self.parse_content(&content, path)
    }

    /// Parse note text; `path` only names the note
    pub fn parse_content(&self, content: &str, path: &Path) -> ParserResult<ParsedNote> {
        let (frontmatter, body) = extract_frontmatter(content)?;

        let outline = parse_outline(body);

        trace!(
            path = %path.display(),
            blocks = outline.len(),
            fields = frontmatter.as_ref().map_or(0, |fm| fm.fields.len()),
            "parsed note"
        );

        Ok(ParsedNote {
            path: path.to_path_buf(),
            frontmatter,
            outline,
        })
    }
}

impl Default for NoteParser {
    fn default() -> Self {
        Self::new()
    }
}
