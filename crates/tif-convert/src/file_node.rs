//! Per-note node construction
//!
//! Builds the complete subtree for one parsed note. Link targets are not
//! known yet, so every wikilink is written as a reference placeholder (see
//! [`crate::reference`]) both inside the node name and in `refs`. Embedded
//! attachments (`![[diagram.png]]`) are not notes and stay plain text.

use chrono::NaiveDate;
use std::path::Path;
use tif_parser::{
    extract_tags, rewrite_wikilinks, BlockKind, Frontmatter, OutlineNode, ParsedNote, TaskStatus,
    Wikilink,
};
use tracing::{debug, trace, warn};

use crate::config::ConvertOptions;
use crate::context::ConversionContext;
use crate::heading_tracker::HeadingTracker;
use crate::model::{NodeType, TanaNode, TodoState};
use crate::reference::{escape_literal, ReferenceToken};

/// Frontmatter keys whose values become supertags instead of fields
const TAG_KEYS: [&str; 2] = ["tags", "tag"];

/// Convert one note into a Tana node subtree.
///
/// Registers the document and its headings in `tracker` and counts the
/// subtree, fields and calendar nodes into `context.summary`.
pub fn build_file_node(
    note: &ParsedNote,
    timestamp: i64,
    context: &mut ConversionContext,
    tracker: &mut HeadingTracker,
) -> TanaNode {
    let stem = note.stem();

    let uid = if tracker.contains(&stem, None) {
        warn!(
            path = %note.path.display(),
            document = %stem,
            "duplicate note name; links resolve to the first one"
        );
        context.next_uid()
    } else {
        tracker.observe_document(&stem, context.uids_mut())
    };

    let mut node = match daily_note_name(&stem).filter(|_| context.options.daily_notes) {
        Some(date_name) => {
            context.summary.calendar_nodes += 1;
            TanaNode::new(uid, date_name, timestamp).with_type(NodeType::Date)
        }
        None => TanaNode::new(uid, escape_literal(&stem), timestamp),
    };

    if let Some(frontmatter) = &note.frontmatter {
        add_frontmatter(&mut node, frontmatter, &stem, timestamp, context);
    }

    let mut builder = BlockBuilder {
        document: &stem,
        timestamp,
        context: &mut *context,
        tracker,
    };
    for block in &note.outline {
        let child = builder.block(block);
        node.children.push(child);
    }

    trace!(
        document = %stem,
        nodes = node.subtree_len(),
        refs = node.refs.len(),
        "built file node"
    );
    context.summary.record_leaves(node.subtree_len());
    node
}

/// `2024-01-31` → `01-31-2024`; `None` for anything that is not a date stem
fn daily_note_name(stem: &str) -> Option<String> {
    if stem.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(stem, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%m-%d-%Y").to_string())
}

fn add_frontmatter(
    node: &mut TanaNode,
    frontmatter: &Frontmatter,
    document: &str,
    timestamp: i64,
    context: &mut ConversionContext,
) {
    for field in &frontmatter.fields {
        if TAG_KEYS.iter().any(|k| field.key.eq_ignore_ascii_case(k)) {
            for name in field.values.iter().flat_map(|v| v.split([',', ' '])) {
                let name = name.trim().trim_start_matches('#');
                if name.is_empty() {
                    continue;
                }
                let tag = context.tag_uid(name);
                push_unique(&mut node.supertags, tag);
            }
            continue;
        }

        let mut field_node = TanaNode::new(context.next_uid(), escape_literal(&field.key), timestamp)
            .with_type(NodeType::Field);
        for value in &field.values {
            let mut value_node = TanaNode::new(context.next_uid(), String::new(), timestamp);
            fill_text(&mut value_node, value, document, context);
            field_node.children.push(value_node);
        }
        context.summary.fields += 1;
        node.children.push(field_node);
    }
}

struct BlockBuilder<'a> {
    document: &'a str,
    timestamp: i64,
    context: &'a mut ConversionContext,
    tracker: &'a mut HeadingTracker,
}

impl BlockBuilder<'_> {
    fn block(&mut self, block: &OutlineNode) -> TanaNode {
        let mut node = match &block.kind {
            BlockKind::Heading { .. } => {
                let uid = self.heading_uid(&block.text, block.line);
                let mut node = TanaNode::new(uid, String::new(), self.timestamp);
                fill_text(&mut node, &block.text, self.document, self.context);
                node
            }
            BlockKind::CodeBlock { language } => {
                let name = escape_literal(&block.text);
                let mut node = TanaNode::new(self.context.next_uid(), name, self.timestamp)
                    .with_type(NodeType::Codeblock);
                node.code_language = language.clone();
                node
            }
            BlockKind::ListItem { task } => {
                let mut node = TanaNode::new(self.context.next_uid(), String::new(), self.timestamp);
                fill_text(&mut node, &block.text, self.document, self.context);
                node.todo_state = task.map(|status| match status {
                    TaskStatus::Pending => TodoState::Todo,
                    TaskStatus::Completed => TodoState::Done,
                });
                node
            }
            BlockKind::Paragraph => {
                let mut node = TanaNode::new(self.context.next_uid(), String::new(), self.timestamp);
                fill_text(&mut node, &block.text, self.document, self.context);
                node
            }
        };

        for child in &block.children {
            let child = self.block(child);
            node.children.push(child);
        }
        node
    }

    fn heading_uid(&mut self, heading: &str, line: usize) -> String {
        if self.tracker.contains(self.document, Some(heading)) {
            warn!(
                document = %self.document,
                heading = %heading,
                line,
                "duplicate heading; links resolve to the first one"
            );
            return self.context.next_uid();
        }
        self.tracker
            .observe_heading(self.document, heading, self.context.uids_mut())
    }
}

/// Set `node.name` from markdown text, replacing wikilinks with placeholders
/// and attaching inline hashtags as supertags.
fn fill_text(node: &mut TanaNode, text: &str, document: &str, context: &mut ConversionContext) {
    let options = &context.options;
    let refs = &mut node.refs;
    node.name = rewrite_wikilinks(&escape_literal(text), |link| {
        if link.is_embed && options.is_attachment(&link.target) {
            trace!(document = %document, target = %link.target, "attachment embed kept as text");
            return None;
        }
        if let Some(block) = &link.block_ref {
            debug!(document = %document, block = %block, "block reference points at its note");
        }
        let placeholder = reference_for(link, document, options).placeholder();
        push_unique(refs, placeholder.clone());
        Some(format!("[[{placeholder}]]"))
    });

    for tag in extract_tags(text) {
        let uid = context.tag_uid(&tag.name);
        push_unique(&mut node.supertags, uid);
    }
}

/// Reference target of a wikilink written inside `document`.
///
/// `[[#Heading]]` points into the current note, `[[folder/Note.md]]` names
/// the note `Note`, and block references fall back to the whole note.
fn reference_for(link: &Wikilink, document: &str, options: &ConvertOptions) -> ReferenceToken {
    let target = link.target.trim();
    let target = if target.is_empty() {
        document
    } else {
        let last = target.rsplit('/').next().unwrap_or(target);
        match last.rsplit_once('.') {
            Some((stem, _)) if options.accepts(Path::new(last)) => stem,
            _ => last,
        }
    };
    ReferenceToken::new(target, link.heading_ref.clone())
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
