//! Reference placeholders
//!
//! While streaming, a link target's uid may not exist yet, so links are
//! written as `{{tif-ref:<document>#<heading>}}` tokens and rewritten by the
//! post-processor. Both components are percent-encoded, so a token never
//! contains characters JSON string escaping would alter and never spans a
//! line.
//!
//! Note text that happens to contain `{{tif-` is written through
//! [`escape_literal`] as `{{tif-!`, which the post-processor turns back into
//! `{{tif-`. A token can therefore only come from a real link.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::heading_tracker::RefKey;

/// Shared by tokens and escaped literal text
const MARKER: &str = "{{tif-";
const ESCAPED_MARKER: &str = "{{tif-!";
const PLACEHOLDER_PREFIX: &str = "{{tif-ref:";

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{tif-(?:!|ref:([A-Za-z0-9%._~\-]*)(?:#([A-Za-z0-9%._~\-]*))?\}\})")
        .expect("placeholder regex")
});

/// Unresolved link target as written into the stream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceToken {
    /// Target document as written in the link (display form)
    pub document: String,
    /// Target heading as written in the link, if any
    pub heading: Option<String>,
}

impl ReferenceToken {
    pub fn new(document: impl Into<String>, heading: Option<String>) -> Self {
        Self {
            document: document.into(),
            heading: heading.filter(|h| !h.trim().is_empty()),
        }
    }

    pub fn key(&self) -> RefKey {
        RefKey::new(&self.document, self.heading.as_deref())
    }

    /// Token text written into the output stream
    pub fn placeholder(&self) -> String {
        let mut token = format!("{}{}", PLACEHOLDER_PREFIX, urlencoding::encode(&self.document));
        if let Some(heading) = &self.heading {
            token.push('#');
            token.push_str(&urlencoding::encode(heading));
        }
        token.push_str("}}");
        token
    }

    fn from_captures(cap: &Captures<'_>) -> Self {
        let document = cap.get(1).map_or("", |m| m.as_str());
        let heading = cap.get(2).map(|m| decode(m.as_str()));
        Self::new(decode(document), heading)
    }
}

fn decode(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| encoded.to_string())
}

/// Escape note text so it can never be read back as a token
pub fn escape_literal(text: &str) -> Cow<'_, str> {
    if text.contains(MARKER) {
        Cow::Owned(text.replace(MARKER, ESCAPED_MARKER))
    } else {
        Cow::Borrowed(text)
    }
}

/// Cheap pre-check before running the placeholder regex
pub fn contains_placeholder(text: &str) -> bool {
    text.contains(MARKER)
}

/// Replace every placeholder token in `text` with `resolve(token)` and
/// restore escaped literal text
pub fn rewrite_placeholders<F>(text: &str, mut resolve: F) -> Cow<'_, str>
where
    F: FnMut(&ReferenceToken) -> String,
{
    PLACEHOLDER_REGEX.replace_all(text, |cap: &Captures<'_>| {
        if cap.get(1).is_none() {
            return MARKER.to_string();
        }
        resolve(&ReferenceToken::from_captures(cap))
    })
}
