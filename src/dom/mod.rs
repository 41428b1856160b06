//! Input element tree.
//!
//! The parser consumes an already-normalized element tree. Nodes live in a
//! single arena and are addressed by [`NodeId`], so per-node annotations can be
//! kept in side tables instead of being written onto the tree.

#[cfg(feature = "html")]
mod html;

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element with its tag name and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Lower-case tag name (e.g. `div`, `ix:nonnumeric`)
    pub name: String,

    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// Create an element without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Add an attribute and return self.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw inline `style` attribute, empty if absent.
    pub fn style_attr(&self) -> &str {
        self.attr("style").unwrap_or("")
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomNode {
    /// The tree root
    Document,
    /// An element
    Element(Element),
    /// A text node
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    data: DomNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-allocated document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    entries: Vec<Entry>,
}

impl Tree {
    /// Create a tree holding only the document root.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry {
                data: DomNode::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    fn append(&mut self, parent: NodeId, data: DomNode) -> NodeId {
        let id = NodeId(self.entries.len());
        self.entries.push(Entry {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.entries[parent.0].children.push(id);
        id
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.append(parent, DomNode::Element(element))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append(parent, DomNode::Text(text.into()))
    }

    /// Get a node payload.
    pub fn get(&self, id: NodeId) -> &DomNode {
        &self.entries[id.0].data
    }

    /// Children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entries[id.0].children
    }

    /// Parent of a node (`None` for the root).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries[id.0].parent
    }

    /// The element at `id`, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.get(id) {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The text at `id`, if it is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.get(id) {
            DomNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Tag name of the element at `id`.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Check whether `id` is an element with the given tag name.
    pub fn is(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    /// Attribute of the element at `id`.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(key))
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// First descendant element with the given tag name.
    pub fn find(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id).find(|&d| self.is(d, name))
    }

    /// All descendant elements with the given tag name, in document order.
    pub fn find_all(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id).filter(|&d| self.is(d, name)).collect()
    }

    /// Check whether any proper ancestor of `id` has the given tag name.
    pub fn has_ancestor(&self, id: NodeId, name: &str) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if self.is(p, name) {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over descendants.
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Table-bearing annotation: which elements have a `table` somewhere below.
///
/// Computed once per tree and consulted read-only during traversal.
#[derive(Debug, Clone)]
pub struct TableMarks {
    marks: Vec<bool>,
}

impl TableMarks {
    /// Mark every proper ancestor of every `table` element.
    pub fn compute(tree: &Tree) -> Self {
        let mut marks = vec![false; tree.len()];
        for id in tree.descendants(tree.root()) {
            if !tree.is(id, "table") {
                continue;
            }
            let mut current = tree.parent(id);
            while let Some(p) = current {
                if marks[p.0] {
                    // Everything above is already marked.
                    break;
                }
                marks[p.0] = true;
                current = tree.parent(p);
            }
        }
        Self { marks }
    }

    /// Check whether `id` contains a table.
    pub fn has_table(&self, id: NodeId) -> bool {
        self.marks.get(id.0).copied().unwrap_or(false)
    }
}
