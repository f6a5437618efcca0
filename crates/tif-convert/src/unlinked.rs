//! Unlinked reference collection
//!
//! Every reference the post-processor cannot resolve is registered here and
//! redirected to a fallback uid. Once post-processing is done the collector
//! turns its entries into one top-level subtree:
//!
//! ```text
//! Unlinked References (<vault>)
//! ├── doc2            ← target of [[doc2]]
//! │   └── Missing     ← target of [[doc2#Missing]]
//! └── ...
//! ```

use std::collections::BTreeMap;
use tracing::debug;

use crate::context::ConversionContext;
use crate::heading_tracker::RefKey;
use crate::model::TanaNode;
use crate::reference::ReferenceToken;
use crate::uid::UidSource;

#[derive(Debug)]
struct UnlinkedHeading {
    name: String,
    uid: String,
}

#[derive(Debug)]
struct UnlinkedDocument {
    name: String,
    uid: String,
    /// The document itself was a link target, not only its headings
    referenced: bool,
    headings: BTreeMap<String, UnlinkedHeading>,
}

#[derive(Debug, Default)]
pub struct UnlinkedNodeCollector {
    documents: BTreeMap<String, UnlinkedDocument>,
}

impl UnlinkedNodeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback uid for an unresolved reference.
    ///
    /// Registering the same key twice returns the same uid.
    pub fn register(&mut self, token: &ReferenceToken, uids: &mut dyn UidSource) -> String {
        let RefKey { document, heading } = token.key();

        let entry = self.documents.entry(document).or_insert_with(|| UnlinkedDocument {
            name: token.document.trim().to_string(),
            uid: uids.next_uid(),
            referenced: false,
            headings: BTreeMap::new(),
        });

        match heading {
            None => {
                entry.referenced = true;
                entry.uid.clone()
            }
            Some(heading_key) => entry
                .headings
                .entry(heading_key)
                .or_insert_with(|| UnlinkedHeading {
                    name: token.heading.as_deref().unwrap_or_default().trim().to_string(),
                    uid: uids.next_uid(),
                })
                .uid
                .clone(),
        }
    }

    /// Number of distinct unresolved keys
    pub fn len(&self) -> usize {
        self.documents
            .values()
            .map(|doc| doc.headings.len() + usize::from(doc.referenced))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build the unlinked subtree, or `None` when every reference resolved.
    ///
    /// Counts the subtree into `context.summary` and sets `broken_refs`.
    pub fn create_unlinked_nodes(
        self,
        vault_label: &str,
        timestamp: i64,
        context: &mut ConversionContext,
    ) -> Option<TanaNode> {
        if self.is_empty() {
            return None;
        }

        let broken = self.len();
        let mut root = TanaNode::new(
            context.next_uid(),
            format!("Unlinked References ({vault_label})"),
            timestamp,
        );

        for document in self.documents.into_values() {
            let mut doc_node = TanaNode::new(document.uid, document.name, timestamp);
            doc_node.children = document
                .headings
                .into_values()
                .map(|heading| TanaNode::new(heading.uid, heading.name, timestamp))
                .collect();
            root.children.push(doc_node);
        }

        context.summary.record_top_level();
        context.summary.record_leaves(root.subtree_len() - 1);
        context.summary.broken_refs = broken as u64;

        debug!(
            documents = root.children.len(),
            broken_refs = broken,
            "created unlinked reference nodes"
        );
        Some(root)
    }
}
