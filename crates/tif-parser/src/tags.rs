//! Inline `#hashtag` extraction
//!
//! A tag starts with `#` that is not preceded by a word character, `/` or
//! `[`, so URL fragments and heading links are not tags. Purely numeric
//! tags (`#123`) are ignored the way Obsidian ignores them.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Tag;
use crate::wikilinks::{code_spans, inside, wikilink_spans};

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}_/&\[#])#([\p{L}\p{N}_\-/]+)").expect("tag regex")
});

/// Extract every hashtag in `text`, in order of appearance
pub fn extract_tags(text: &str) -> Vec<Tag> {
    if !text.contains('#') {
        return Vec::new();
    }

    let mut excluded = code_spans(text);
    excluded.extend(wikilink_spans(text));

    let mut tags = Vec::new();
    for cap in TAG_REGEX.captures_iter(text) {
        let Some(name) = cap.get(1) else {
            continue;
        };
        // '#' sits right before the name group
        let offset = name.start() - 1;
        if inside(&excluded, offset) {
            continue;
        }

        let tag_name = name.as_str().trim_end_matches('/');
        if tag_name.is_empty() || tag_name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        tags.push(Tag {
            name: tag_name.to_string(),
        });
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        extract_tags(text).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_simple_tags() {
        assert_eq!(names("#start middle #rust and #project/sub"), vec![
            "start",
            "rust",
            "project/sub"
        ]);
    }

    #[test]
    fn test_tag_after_punctuation() {
        assert_eq!(names("(#a) x,#b"), vec!["a", "b"]);
    }

    #[test]
    fn test_headings_are_not_tags() {
        assert!(names("# Heading").is_empty());
    }

    #[test]
    fn test_urls_and_numbers_skipped() {
        assert!(names("see https://example.com/#anchor and page.html#top").is_empty());
        assert!(names("issue #123").is_empty());
    }

    #[test]
    fn test_code_and_links_skipped() {
        assert!(names("`#inside` and [[#Heading]] and [[Note#Sub]]").is_empty());
    }
}
