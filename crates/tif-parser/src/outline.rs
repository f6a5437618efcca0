//! Markdown outliner
//!
//! Builds the block tree a note is converted from, driven by the
//! pulldown-cmark event stream:
//! - A heading (ATX or setext) owns every following block until the next
//!   heading of the same or a higher level
//! - List items nest the way the markdown nests them
//! - A code block is a single leaf, whatever its fence length
//!
//! Block text is the source slice covering the block's inline content, so
//! wikilinks, code spans and hashtags reach the converter as written.
//! Thematic breaks and blank lines carry no content and are dropped.

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag as CmarkTag, TagEnd,
};
use std::ops::Range;

use crate::types::{BlockKind, OutlineNode, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Heading(u8),
    ListItem,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    node: OutlineNode,
}

/// Code block being collected
struct OpenCode {
    language: Option<String>,
    line: usize,
    text: String,
}

struct OutlineBuilder<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
    roots: Vec<OutlineNode>,
    stack: Vec<Frame>,
    /// Source range of the inline content since the last block boundary
    inline: Option<Range<usize>>,
    /// Level and line of the heading whose content is being read
    heading: Option<(u8, usize)>,
    code: Option<OpenCode>,
}

impl<'a> OutlineBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
            roots: Vec::new(),
            stack: Vec::new(),
            inline: None,
            heading: None,
            code: None,
        }
    }

    /// 1-based line containing byte `offset`
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn extend(&mut self, range: Range<usize>) {
        self.inline = Some(match self.inline.take() {
            Some(open) => open.start.min(range.start)..open.end.max(range.end),
            None => range,
        });
    }

    fn take_text(&mut self) -> Option<(String, usize)> {
        let range = self.inline.take()?;
        let text = inline_text(self.source.get(range.clone())?);
        (!text.is_empty()).then(|| (text, self.line_of(range.start)))
    }

    fn attach(&mut self, node: OutlineNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.node);
        }
    }

    fn in_list_item(&self) -> bool {
        self.stack.iter().any(|f| f.kind == FrameKind::ListItem)
    }

    /// Close the pending inline run: it names an empty list item, or becomes
    /// a paragraph.
    fn flush(&mut self) {
        let Some((text, line)) = self.take_text() else {
            return;
        };
        if let Some(top) = self.stack.last_mut() {
            let untitled = top.kind == FrameKind::ListItem
                && top.node.text.is_empty()
                && top.node.children.is_empty();
            if untitled {
                top.node.text = text;
                return;
            }
        }
        self.attach(OutlineNode::new(BlockKind::Paragraph, text, line));
    }

    fn start_heading(&mut self, level: u8, offset: usize) {
        self.flush();
        self.heading = Some((level, self.line_of(offset)));
    }

    fn end_heading(&mut self) {
        let Some((level, line)) = self.heading.take() else {
            return;
        };
        let text = self.take_text().map(|(text, _)| text).unwrap_or_default();
        let node = OutlineNode::new(BlockKind::Heading { level }, text, line);

        // Headings nested in list items stay inside the item
        if self.in_list_item() {
            self.attach(node);
            return;
        }

        while self
            .stack
            .last()
            .is_some_and(|f| matches!(f.kind, FrameKind::Heading(open) if open >= level))
        {
            self.pop();
        }
        self.stack.push(Frame {
            kind: FrameKind::Heading(level),
            node,
        });
    }

    fn start_item(&mut self, offset: usize) {
        self.flush();
        let line = self.line_of(offset);
        self.stack.push(Frame {
            kind: FrameKind::ListItem,
            node: OutlineNode::new(BlockKind::ListItem { task: None }, String::new(), line),
        });
    }

    fn end_item(&mut self) {
        self.flush();
        if self.stack.last().is_some_and(|f| f.kind == FrameKind::ListItem) {
            self.pop();
        }
    }

    fn task(&mut self, checked: bool) {
        let status = if checked {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        if let Some(top) = self.stack.last_mut() {
            if top.kind == FrameKind::ListItem {
                top.node.kind = BlockKind::ListItem { task: Some(status) };
            }
        }
    }

    fn start_code(&mut self, kind: CodeBlockKind<'_>, offset: usize) {
        self.flush();
        let language = match kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
            CodeBlockKind::Indented => None,
        };
        self.code = Some(OpenCode {
            language,
            line: self.line_of(offset),
            text: String::new(),
        });
    }

    fn end_code(&mut self) {
        if let Some(code) = self.code.take() {
            let kind = BlockKind::CodeBlock {
                language: code.language,
            };
            let text = code.text.trim_end_matches(['\n', '\r']);
            self.attach(OutlineNode::new(kind, text, code.line));
        }
    }

    fn finish(mut self) -> Vec<OutlineNode> {
        self.end_code();
        self.flush();
        while !self.stack.is_empty() {
            self.pop();
        }
        self.roots
    }
}

/// Collapse a multi-line inline run onto one line.
///
/// Continuation lines lose their indentation and any block quote markers.
fn inline_text(raw: &str) -> String {
    raw.lines()
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim();
            if i == 0 {
                line
            } else {
                line.trim_start_matches('>').trim_start()
            }
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse a note body (frontmatter already removed) into an outline tree.
pub fn parse_outline(body: &str) -> Vec<OutlineNode> {
    let mut builder = OutlineBuilder::new(body);
    let options = Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;

    for (event, range) in CmarkParser::new_ext(body, options).into_offset_iter() {
        if let Some(code) = builder.code.as_mut() {
            match event {
                Event::Text(text) => code.text.push_str(&text),
                Event::End(TagEnd::CodeBlock) => builder.end_code(),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(CmarkTag::Heading { level, .. }) => {
                builder.start_heading(heading_level_to_u8(level), range.start)
            }
            Event::End(TagEnd::Heading(_)) => builder.end_heading(),
            Event::Start(CmarkTag::CodeBlock(kind)) => builder.start_code(kind, range.start),
            Event::Start(CmarkTag::Item) => builder.start_item(range.start),
            Event::End(TagEnd::Item) => builder.end_item(),
            Event::TaskListMarker(checked) => builder.task(checked),

            // Inline markup: the source range already covers it
            Event::Start(
                CmarkTag::Emphasis
                | CmarkTag::Strong
                | CmarkTag::Strikethrough
                | CmarkTag::Link { .. }
                | CmarkTag::Image { .. },
            ) => builder.extend(range),
            Event::End(
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image,
            ) => {}
            Event::Text(_)
            | Event::Code(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::SoftBreak
            | Event::HardBreak => builder.extend(range),

            // Any other block boundary ends the current inline run
            _ => builder.flush(),
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn test_headings_own_following_blocks() {
        let outline = parse_outline("# Intro\nfirst\n## Detail\nsecond\n# Next\nthird\n");
        assert_eq!(texts(&outline), vec!["Intro", "Next"]);
        assert_eq!(outline[0].kind, BlockKind::Heading { level: 1 });
        assert_eq!(texts(&outline[0].children), vec!["first", "Detail"]);
        assert_eq!(texts(&outline[0].children[1].children), vec!["second"]);
        assert_eq!(texts(&outline[1].children), vec!["third"]);
    }

    #[test]
    fn test_setext_headings() {
        let outline = parse_outline("Intro\n=====\nbody\n\nSub\n---\nmore\n");
        assert_eq!(texts(&outline), vec!["Intro"]);
        assert_eq!(outline[0].kind, BlockKind::Heading { level: 1 });
        assert_eq!(texts(&outline[0].children), vec!["body", "Sub"]);

        let sub = &outline[0].children[1];
        assert_eq!(sub.kind, BlockKind::Heading { level: 2 });
        assert_eq!(sub.line, 5);
        assert_eq!(texts(&sub.children), vec!["more"]);
    }

    #[test]
    fn test_text_before_first_heading_is_top_level() {
        let outline = parse_outline("preamble\n\n## Later\nbody");
        assert_eq!(texts(&outline), vec!["preamble", "Later"]);
    }

    #[test]
    fn test_list_nesting() {
        let outline = parse_outline("- a\n  - b\n    - c\n  - d\n- e\n");
        assert_eq!(texts(&outline), vec!["a", "e"]);
        assert_eq!(texts(&outline[0].children), vec!["b", "d"]);
        assert_eq!(texts(&outline[0].children[0].children), vec!["c"]);
    }

    #[test]
    fn test_tasks() {
        let outline = parse_outline("- [ ] open\n- [x] done\n* plain");
        assert_eq!(outline[0].kind, BlockKind::ListItem { task: Some(TaskStatus::Pending) });
        assert_eq!(outline[0].text, "open");
        assert_eq!(outline[1].kind, BlockKind::ListItem { task: Some(TaskStatus::Completed) });
        assert_eq!(outline[2].kind, BlockKind::ListItem { task: None });
        assert_eq!(outline[2].text, "plain");
    }

    #[test]
    fn test_fenced_code_is_one_block() {
        let outline = parse_outline("# Code\n```rust\nfn main() {}\n\n# not a heading\n```\nafter");
        let code = &outline[0].children[0];
        assert_eq!(code.kind, BlockKind::CodeBlock { language: Some("rust".into()) });
        assert_eq!(code.text, "fn main() {}\n\n# not a heading");
        assert_eq!(outline[0].children[1].text, "after");
    }

    #[test]
    fn test_long_fence_holds_shorter_fences() {
        let outline = parse_outline("````md\n```\n# Fake\n```\n````");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].kind, BlockKind::CodeBlock { language: Some("md".into()) });
        assert_eq!(outline[0].text, "```\n# Fake\n```");
        assert!(outline[0].children.is_empty());
    }

    #[test]
    fn test_indented_continuation_joins_list_item() {
        let outline = parse_outline("- item\n  continued\n\nback out");
        assert_eq!(texts(&outline), vec!["item continued", "back out"]);
        assert!(outline[0].children.is_empty());
    }

    #[test]
    fn test_second_paragraph_in_item_is_child() {
        let outline = parse_outline("- first\n\n  second\n");
        assert_eq!(texts(&outline), vec!["first"]);
        assert_eq!(outline[0].children[0].kind, BlockKind::Paragraph);
        assert_eq!(outline[0].children[0].text, "second");
    }

    #[test]
    fn test_inline_source_kept_verbatim() {
        let text = "See [[doc1#Intro|the intro]], `[[x]]` and *em* #tag";
        let outline = parse_outline(text);
        assert_eq!(outline[0].text, text);
    }

    #[test]
    fn test_closing_hashes_and_breaks() {
        let outline = parse_outline("## Title ##\n---\ntext");
        assert_eq!(outline[0].text, "Title");
        assert_eq!(texts(&outline[0].children), vec!["text"]);
    }

    #[test]
    fn test_hashtag_line_is_paragraph() {
        let outline = parse_outline("#tag only");
        assert_eq!(outline[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_block_quote_lines_joined() {
        let outline = parse_outline("> quoted\n> more");
        assert_eq!(texts(&outline), vec!["quoted more"]);
    }

    #[test]
    fn test_line_numbers() {
        let outline = parse_outline("a\n\n# H\n\n- item\n");
        assert_eq!(outline[0].line, 1);
        assert_eq!(outline[1].line, 3);
        assert_eq!(outline[1].children[0].line, 5);
    }
}
