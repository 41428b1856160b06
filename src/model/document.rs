//! Document-level types.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Node;

/// A parsed document: an ordered, immutable sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<DocumentData>,
}

impl Document {
    /// Create a document from finished nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, data: None }
    }

    /// Attach side-channel document data and return self.
    pub fn with_data(mut self, data: Option<DocumentData>) -> Self {
        self.data = data;
        self
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterate over nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Table nodes in document order.
    pub fn tables(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.is_table()).collect()
    }

    /// Document data extracted alongside the markup, passed through as given.
    pub fn data(&self) -> Option<&DocumentData> {
        self.data.as_ref()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(|node| node.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Index<usize> for Document {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Structured data extracted from the same source as the markup
/// (e.g. hidden inline XBRL facts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    /// Values by key
    pub values: BTreeMap<String, Value>,
}

impl DocumentData {
    /// Create empty document data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if there is no data.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
