//! Document nodes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StyleInfo, TableRow};
use crate::error::{Error, Result};

/// Arbitrary per-node metadata.
pub type Metadata = HashMap<String, Value>;

/// Kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A heading with a level
    Heading,
    /// A block of text
    TextBlock,
    /// A table
    Table,
}

impl NodeKind {
    /// Name of the kind as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Heading => "heading",
            NodeKind::TextBlock => "text_block",
            NodeKind::Table => "table",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "heading" => Ok(NodeKind::Heading),
            "text_block" => Ok(NodeKind::TextBlock),
            "table" => Ok(NodeKind::Table),
            other => Err(Error::UnknownNodeKind(other.to_string())),
        }
    }
}

/// Content carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    /// Plain text, for headings and text blocks
    Text(String),
    /// Ordered rows, for tables
    Rows(Vec<TableRow>),
}

/// A node of the document model.
///
/// The content shape always matches the kind: headings and text blocks hold
/// text, tables hold rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct Node {
    kind: NodeKind,
    content: NodeContent,
    style: StyleInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    metadata: Metadata,
}

/// Serialized form of a [`Node`], checked through [`Node::new`] on the way in.
#[derive(Deserialize)]
struct RawNode {
    kind: NodeKind,
    content: NodeContent,
    #[serde(default)]
    style: StyleInfo,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<RawNode> for Node {
    type Error = Error;

    fn try_from(raw: RawNode) -> Result<Self> {
        let node = Node::new(raw.kind, raw.content, raw.style, raw.level.unwrap_or(1))?;
        Ok(node.with_metadata(raw.metadata))
    }
}

impl Node {
    /// Create a node, validating that the content matches the kind.
    ///
    /// `level` applies to headings only and is ignored otherwise.
    pub fn new(kind: NodeKind, content: NodeContent, style: StyleInfo, level: u8) -> Result<Self> {
        match (kind, &content) {
            (NodeKind::Heading | NodeKind::TextBlock, NodeContent::Text(_))
            | (NodeKind::Table, NodeContent::Rows(_)) => {}
            (NodeKind::Table, NodeContent::Text(_)) => {
                return Err(Error::InvalidContent {
                    kind: kind.to_string(),
                    expected: "row",
                })
            }
            (_, NodeContent::Rows(_)) => {
                return Err(Error::InvalidContent {
                    kind: kind.to_string(),
                    expected: "text",
                })
            }
        }
        Ok(Self {
            kind,
            content,
            style,
            level: (kind == NodeKind::Heading).then_some(level),
            metadata: Metadata::new(),
        })
    }

    /// Create a heading node.
    pub fn heading(text: impl Into<String>, style: StyleInfo, level: u8) -> Self {
        Self {
            kind: NodeKind::Heading,
            content: NodeContent::Text(text.into()),
            style,
            level: Some(level),
            metadata: Metadata::new(),
        }
    }

    /// Create a text block node.
    pub fn text_block(text: impl Into<String>, style: StyleInfo) -> Self {
        Self {
            kind: NodeKind::TextBlock,
            content: NodeContent::Text(text.into()),
            style,
            level: None,
            metadata: Metadata::new(),
        }
    }

    /// Create a table node.
    pub fn table(rows: Vec<TableRow>, style: StyleInfo) -> Self {
        Self {
            kind: NodeKind::Table,
            content: NodeContent::Rows(rows),
            style,
            level: None,
            metadata: Metadata::new(),
        }
    }

    /// Replace the metadata and return self.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Kind of the node.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Resolved style.
    pub fn style(&self) -> &StyleInfo {
        &self.style
    }

    /// Raw content.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Heading level, for headings only.
    pub fn level(&self) -> Option<u8> {
        self.level
    }

    /// Text of a heading or text block.
    pub fn text(&self) -> Result<&str> {
        match &self.content {
            NodeContent::Text(text) => Ok(text),
            NodeContent::Rows(_) => Err(Error::ContentAccess {
                kind: self.kind.to_string(),
                requested: "text",
            }),
        }
    }

    /// Rows of a table.
    pub fn rows(&self) -> Result<&[TableRow]> {
        match &self.content {
            NodeContent::Rows(rows) => Ok(rows),
            NodeContent::Text(_) => Err(Error::ContentAccess {
                kind: self.kind.to_string(),
                requested: "rows",
            }),
        }
    }

    /// Check whether the node is a table.
    pub fn is_table(&self) -> bool {
        self.kind == NodeKind::Table
    }

    /// All metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Add or update a metadata entry.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get a metadata entry.
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Remove a metadata entry if present.
    pub fn remove_metadata(&mut self, key: &str) -> Option<Value> {
        self.metadata.remove(key)
    }

    /// Plain text: the text itself, or table rows joined by newlines.
    pub fn plain_text(&self) -> String {
        match &self.content {
            NodeContent::Text(text) => text.clone(),
            NodeContent::Rows(rows) => rows
                .iter()
                .map(|row| row.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
