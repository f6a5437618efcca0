//! Tana Intermediate Format data model

use serde::{Deserialize, Serialize};

/// Version literal written at the top of every output file
pub const TIF_VERSION: &str = "TanaIntermediateFile V0.1";

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Node,
    Field,
    Codeblock,
    Date,
}

/// Checkbox state of a task node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    Todo,
    Done,
}

/// One node of the output forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TanaNode {
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
    pub edited_at: i64,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TanaNode>,
    /// Uids of referenced nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<String>,
    /// Uids of attached supertags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_state: Option<TodoState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<String>,
}

impl TanaNode {
    /// Plain node created and edited at `timestamp`
    pub fn new(uid: impl Into<String>, name: impl Into<String>, timestamp: i64) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            description: None,
            created_at: timestamp,
            edited_at: timestamp,
            node_type: NodeType::Node,
            children: Vec::new(),
            refs: Vec::new(),
            supertags: Vec::new(),
            todo_state: None,
            code_language: None,
        }
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// This node plus all descendants
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TanaNode::subtree_len).sum::<usize>()
    }
}

/// Entry of the `supertags` registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperTag {
    pub uid: String,
    pub name: String,
}

/// Summary counters appended at the end of the output.
///
/// Field order is part of the output contract. "Leaf" follows Tana's meaning:
/// every node that is not top-level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub leaf_nodes: u64,
    pub top_level_nodes: u64,
    pub total_nodes: u64,
    pub calendar_nodes: u64,
    pub fields: u64,
    pub broken_refs: u64,
}

impl ConversionSummary {
    /// Count `count` nested nodes
    pub fn record_leaves(&mut self, count: usize) {
        self.leaf_nodes += count as u64;
        self.total_nodes += count as u64;
    }

    /// Count one node placed directly in the top-level `nodes` array
    pub fn record_top_level(&mut self) {
        self.top_level_nodes += 1;
        self.total_nodes += 1;
    }

    /// Move the vault root from the leaf count to the top-level count.
    ///
    /// The root is counted as a leaf when its container opens; this runs once
    /// after traversal, whether or not the root ended up with children.
    pub fn reclassify_vault_root(&mut self) {
        self.leaf_nodes = self.leaf_nodes.saturating_sub(1);
        self.top_level_nodes += 1;
    }
}
