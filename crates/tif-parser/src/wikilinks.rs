//! Wikilink extraction
//!
//! Supports Obsidian-style wikilinks:
//! - Basic wikilinks: `[[note]]`
//! - Wikilinks with aliases: `[[note|alias]]`
//! - Wikilinks with headings: `[[note#heading]]` and `[[#heading]]`
//! - Wikilinks with block references: `[[note#^block-id]]`
//! - Embeds: `![[note]]`
//!
//! Links inside inline code spans are ignored.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

use crate::types::Wikilink;

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]]+)\]\]").expect("wikilink regex"));

static CODE_SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("code span regex"));

/// Byte ranges of inline code spans in `text`
pub(crate) fn code_spans(text: &str) -> Vec<Range<usize>> {
    CODE_SPAN_REGEX.find_iter(text).map(|m| m.range()).collect()
}

/// Byte ranges of wikilinks in `text`, code spans excluded
pub(crate) fn wikilink_spans(text: &str) -> Vec<Range<usize>> {
    let code = code_spans(text);
    WIKILINK_REGEX
        .find_iter(text)
        .filter(|m| !inside(&code, m.start()))
        .map(|m| m.range())
        .collect()
}

pub(crate) fn inside(ranges: &[Range<usize>], offset: usize) -> bool {
    ranges.iter().any(|r| r.contains(&offset))
}

fn wikilink_from(cap: &Captures<'_>) -> Wikilink {
    let is_embed = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
    let inner = cap.get(2).map_or("", |m| m.as_str());
    Wikilink::parse(inner, is_embed)
}

/// Replace every wikilink in `text` with the string returned by `replace`.
///
/// A link for which `replace` returns `None` is kept as written, and links
/// inside code spans are never offered to it.
pub fn rewrite_wikilinks<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&Wikilink) -> Option<String>,
{
    if !text.contains("[[") {
        return text.to_string();
    }

    let code = code_spans(text);
    WIKILINK_REGEX
        .replace_all(text, |cap: &Captures<'_>| {
            let full = cap.get(0).expect("group 0 always matches");
            if inside(&code, full.start()) {
                return full.as_str().to_string();
            }
            replace(&wikilink_from(cap)).unwrap_or_else(|| full.as_str().to_string())
        })
        .into_owned()
}
