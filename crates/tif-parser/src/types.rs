//! Parsed note types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully parsed vault note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedNote {
    /// Path the note was read from (or the virtual path given to the parser)
    pub path: PathBuf,

    /// Leading YAML frontmatter, if any
    pub frontmatter: Option<Frontmatter>,

    /// Top-level outline blocks in document order
    pub outline: Vec<OutlineNode>,
}

impl ParsedNote {
    /// File stem of the note, used as its document identifier
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// YAML frontmatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Top-level keys in declaration order
    pub fields: Vec<FrontmatterField>,
}

/// One top-level frontmatter key with its stringified values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontmatterField {
    pub key: String,
    pub values: Vec<String>,
}

/// Task checkbox state of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// Kind of outline block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// ATX or setext heading, level 1-6
    Heading { level: u8 },
    /// Paragraph, joined onto one line
    Paragraph,
    /// Bullet or numbered list item
    ListItem { task: Option<TaskStatus> },
    /// Fenced or indented code block
    CodeBlock { language: Option<String> },
}

/// One block in the outline tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub kind: BlockKind,

    /// Inline source of the block; code blocks hold their raw content
    pub text: String,

    /// 1-based line number in the note body
    pub line: usize,

    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(kind: BlockKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            children: Vec::new(),
        }
    }

    /// This node plus all descendants
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::subtree_len)
            .sum::<usize>()
    }
}

/// Obsidian wikilink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wikilink {
    /// Target note name (empty for same-note heading links like `[[#Heading]]`)
    pub target: String,
    pub heading_ref: Option<String>,
    pub block_ref: Option<String>,
    /// `![[...]]` rather than `[[...]]`
    pub is_embed: bool,
}

impl Wikilink {
    /// Parse the inside of a wikilink (e.g., "Note#heading|Alias").
    ///
    /// The alias only affects how Obsidian renders the link and is dropped.
    pub fn parse(text: &str, is_embed: bool) -> Self {
        let target_part = text.split_once('|').map_or(text, |(t, _)| t);

        let (target, heading_ref, block_ref) = match target_part.split_once('#') {
            Some((t, ref_part)) => match ref_part.strip_prefix('^') {
                Some(block) => (t, None, Some(block.trim().to_string())),
                None if ref_part.trim().is_empty() => (t, None, None),
                None => (t, Some(ref_part.trim().to_string()), None),
            },
            None => (target_part, None, None),
        };

        Self {
            target: target.trim().to_string(),
            heading_ref,
            block_ref,
            is_embed,
        }
    }
}

/// Inline `#hashtag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name without the leading `#`
    pub name: String,
}
