//! Obsidian Markdown Parser
//!
//! Turns one vault note into a [`ParsedNote`]:
//! - YAML frontmatter as ordered fields
//! - An outline tree built from the pulldown-cmark event stream (headings own
//!   the blocks below them, list items nest, code blocks stay whole)
//!
//! Block text keeps its inline source; [`rewrite_wikilinks`] and
//! [`extract_tags`] read Obsidian wikilinks and `#hashtags` out of it.
//!
//! The parser owns nothing: every entry point is a pure function of the
//! note text, apart from [`NoteParser::parse_file`] which reads the file first.

pub mod error;
pub mod frontmatter;
pub mod outline;
pub mod parser;
pub mod tags;
pub mod types;
pub mod wikilinks;

pub use error::{ParserError, ParserResult};
pub use frontmatter::extract_frontmatter;
pub use outline::parse_outline;
pub use parser::NoteParser;
pub use tags::extract_tags;
pub use types::{
    BlockKind, Frontmatter, FrontmatterField, OutlineNode, ParsedNote, Tag, TaskStatus, Wikilink,
};
pub use wikilinks::rewrite_wikilinks;
