//! Heading and document identifier registry
//!
//! Maps (document, heading) keys to the uid of the node that defines them.
//! Keys with no heading stand for the document node itself. Entries are only
//! created by definitions seen during traversal; references look keys up
//! after traversal through [`HeadingTracker::resolve`].

use std::collections::HashMap;

use crate::uid::UidSource;

/// Collapse whitespace and lowercase, so `Intro`, ` intro ` and `INTRO`
/// name the same heading.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized (document, heading) key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefKey {
    pub document: String,
    pub heading: Option<String>,
}

impl RefKey {
    pub fn new(document: &str, heading: Option<&str>) -> Self {
        let heading = heading.map(normalize).filter(|h| !h.is_empty());
        Self {
            document: normalize(document),
            heading,
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadingTracker {
    entries: HashMap<RefKey, String>,
}

impl HeadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uid for `heading` in `document`; generated on the first call for a
    /// key and returned unchanged afterwards.
    pub fn observe_heading(
        &mut self,
        document: &str,
        heading: &str,
        uids: &mut dyn UidSource,
    ) -> String {
        self.observe(RefKey::new(document, Some(heading)), uids)
    }

    /// Uid for the document node itself
    pub fn observe_document(&mut self, document: &str, uids: &mut dyn UidSource) -> String {
        self.observe(RefKey::new(document, None), uids)
    }

    fn observe(&mut self, key: RefKey, uids: &mut dyn UidSource) -> String {
        self.entries
            .entry(key)
            .or_insert_with(|| uids.next_uid())
            .clone()
    }

    /// Look up a key without registering it
    pub fn resolve(&self, document: &str, heading: Option<&str>) -> Option<&str> {
        self.entries
            .get(&RefKey::new(document, heading))
            .map(String::as_str)
    }

    pub fn contains(&self, document: &str, heading: Option<&str>) -> bool {
        self.resolve(document, heading).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uid::SequentialUids;

    #[test]
    fn test_observe_is_stable_per_key() {
        let mut uids = SequentialUids::default();
        let mut tracker = HeadingTracker::new();

        let first = tracker.observe_heading("doc1", "Intro", &mut uids);
        let again = tracker.observe_heading("Doc1", "  intro ", &mut uids);
        let other = tracker.observe_heading("doc1", "Outro", &mut uids);

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_document_and_heading_keys_are_distinct() {
        let mut uids = SequentialUids::default();
        let mut tracker = HeadingTracker::new();

        let doc = tracker.observe_document("doc1", &mut uids);
        let heading = tracker.observe_heading("doc1", "doc1", &mut uids);
        assert_ne!(doc, heading);
        assert_eq!(tracker.resolve("doc1", None), Some(doc.as_str()));
    }

    #[test]
    fn test_resolve_miss_does_not_register() {
        let tracker = HeadingTracker::new();
        assert_eq!(tracker.resolve("doc2", Some("Missing")), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_blank_heading_means_document() {
        let mut uids = SequentialUids::default();
        let mut tracker = HeadingTracker::new();
        let doc = tracker.observe_document("note", &mut uids);
        assert_eq!(tracker.resolve("note", Some("  ")), Some(doc.as_str()));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello   World "), "hello world");
    }
}
