//! Conversion context threaded through one run
//!
//! Mutation points:
//! - the container callback and the file node builder add leaves to
//!   `summary` (the builder also counts `fields` and `calendar_nodes`)
//! - the finalization step reclassifies the vault root
//! - the unlinked collector adds its top-level node and sets `broken_refs`
//! - the file node builder registers tags

use std::collections::BTreeMap;

use crate::config::ConvertOptions;
use crate::model::{ConversionSummary, SuperTag};
use crate::uid::{RandomUids, UidSource};

/// Deduplicated tag labels, keyed case-insensitively
#[derive(Debug, Default, Clone)]
pub struct TagRegistry {
    tags: BTreeMap<String, SuperTag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uid of the tag named `name`, registering it on first sight.
    ///
    /// The first spelling seen is kept as the display name.
    pub fn uid_for(&mut self, name: &str, uids: &mut dyn UidSource) -> String {
        let name = name.trim().trim_start_matches('#');
        self.tags
            .entry(name.to_lowercase())
            .or_insert_with(|| SuperTag {
                uid: uids.next_uid(),
                name: name.to_string(),
            })
            .uid
            .clone()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Registry entries ordered by name
    pub fn to_super_tags(&self) -> Vec<SuperTag> {
        self.tags.values().cloned().collect()
    }
}

/// Counters, registries and the uid source for one conversion run
pub struct ConversionContext {
    pub summary: ConversionSummary,
    pub tags: TagRegistry,
    pub options: ConvertOptions,
    uids: Box<dyn UidSource>,
}

impl ConversionContext {
    /// Context with random uids and default options
    pub fn new() -> Self {
        Self::with_uids(Box::new(RandomUids))
    }

    pub fn with_uids(uids: Box<dyn UidSource>) -> Self {
        Self {
            summary: ConversionSummary::default(),
            tags: TagRegistry::new(),
            options: ConvertOptions::default(),
            uids,
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn next_uid(&mut self) -> String {
        self.uids.next_uid()
    }

    pub fn uids_mut(&mut self) -> &mut dyn UidSource {
        self.uids.as_mut()
    }

    /// Supertag uid for `name`
    pub fn tag_uid(&mut self, name: &str) -> String {
        self.tags.uid_for(name, self.uids.as_mut())
    }

    pub fn create_super_tag_objects(&self) -> Vec<SuperTag> {
        self.tags.to_super_tags()
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionContext")
            .field("summary", &self.summary)
            .field("tags", &self.tags.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
