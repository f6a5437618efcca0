//! Conversion options

use serde::{Deserialize, Serialize};
use std::path::Path;
use tif_parser::parser::DEFAULT_MAX_FILE_SIZE;
use tif_parser::NoteParser;

use crate::traversal::WalkOptions;

/// Options controlling what gets converted and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Descend into hidden entries such as `.obsidian` or `.trash`
    pub include_hidden: bool,

    /// Follow symlinked files and directories
    pub follow_links: bool,

    /// File extensions converted as notes (case-insensitive, no leading dot)
    pub extensions: Vec<String>,

    /// Turn `YYYY-MM-DD` notes into calendar date nodes
    pub daily_notes: bool,

    /// Per-note size limit in bytes; `None` disables it
    pub max_file_size: Option<u64>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            follow_links: false,
            extensions: vec!["md".to_string()],
            daily_notes: true,
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl ConvertOptions {
    /// Whether `path` has one of the configured note extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy();
            self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
    }

    /// Link target naming a non-note file, such as `diagram.png`
    pub fn is_attachment(&self, target: &str) -> bool {
        let path = Path::new(target);
        path.extension().is_some() && !self.accepts(path)
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            include_hidden: self.include_hidden,
            follow_links: self.follow_links,
        }
    }

    pub fn parser(&self) -> NoteParser {
        NoteParser::new().with_max_file_size(self.max_file_size)
    }
}
