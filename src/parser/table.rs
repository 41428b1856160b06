//! Table reconstruction from `table` elements.

use serde_json::{Map, Value};

use super::css::parse_style;
use super::text::clean_cell_entities;
use crate::dom::{NodeId, Tree};
use crate::model::{Alignment, Metadata, Node, TableCell, TableRow};

/// Builds table nodes from `table` elements.
pub struct TableBuilder<'a> {
    tree: &'a Tree,
}

impl<'a> TableBuilder<'a> {
    /// Create a builder over a tree.
    pub fn new(tree: &'a Tree) -> Self {
        Self { tree }
    }

    /// Build a table node, or `None` if the table has no non-empty rows.
    ///
    /// Every `tr` below the table becomes a row, whatever `thead`/`tbody`
    /// grouping sits between them. The node style is the table's own inline
    /// style, and its metadata records the `id`, `class` and `data-*`
    /// attributes.
    pub fn build(&self, table: NodeId) -> Option<Node> {
        let rows: Vec<TableRow> = self
            .tree
            .find_all(table, "tr")
            .into_iter()
            .map(|tr| self.build_row(tr))
            .filter(|row| !row.cells.is_empty())
            .collect();

        if rows.is_empty() {
            log::debug!("TableBuilder: dropping table without rows");
            return None;
        }

        let element = self.tree.element(table)?;
        let style = parse_style(element.style_attr());
        Some(Node::table(rows, style).with_metadata(self.metadata(table)))
    }

    fn build_row(&self, tr: NodeId) -> TableRow {
        let cells = self
            .tree
            .descendants(tr)
            .filter(|&d| self.tree.is(d, "td") || self.tree.is(d, "th"))
            .flat_map(|cell| self.build_cells(cell))
            .collect();

        TableRow {
            cells,
            is_header: self.tree.has_ancestor(tr, "thead"),
        }
    }

    /// Convert one source cell into model cells.
    ///
    /// A right-aligned cell spanning several columns is split into empty
    /// right-aligned cells followed by the content cell, so the value stays in
    /// the rightmost column it covered.
    fn build_cells(&self, cell: NodeId) -> Vec<TableCell> {
        let colspan = self.span_attr(cell, "colspan");
        let rowspan = self.span_attr(cell, "rowspan");
        let style = parse_style(self.tree.attr(cell, "style").unwrap_or(""));
        let text = self.cell_text(cell);

        if style.text_align.as_deref() == Some("right") && colspan > 1 {
            let mut cells: Vec<TableCell> = (0..colspan - 1)
                .map(|_| {
                    TableCell::empty()
                        .rowspan(rowspan)
                        .align(Alignment::Right)
                })
                .collect();
            cells.push(
                TableCell::text(text)
                    .rowspan(rowspan)
                    .align(Alignment::Right)
                    .currency(false),
            );
            return cells;
        }

        vec![TableCell::text(text)
            .colspan(colspan)
            .rowspan(rowspan)
            .align(Alignment::from_css(style.text_align.as_deref()))]
    }

    fn span_attr(&self, cell: NodeId, name: &str) -> usize {
        self.tree
            .attr(cell, name)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1)
    }

    /// Cell text: one line per direct `div` child when there are any,
    /// otherwise the whole text with `<br>` as line breaks.
    fn cell_text(&self, cell: NodeId) -> String {
        let divs: Vec<NodeId> = self
            .tree
            .children(cell)
            .iter()
            .copied()
            .filter(|&c| self.tree.is(c, "div"))
            .collect();

        if !divs.is_empty() {
            return divs
                .iter()
                .map(|&div| clean_cell_entities(self.tree.text_content(div).trim()))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut text = String::new();
        self.push_text_with_breaks(cell, &mut text);
        clean_cell_entities(&text).trim().to_string()
    }

    fn push_text_with_breaks(&self, id: NodeId, out: &mut String) {
        for node in self.tree.descendants(id) {
            if let Some(text) = self.tree.text(node) {
                out.push_str(text);
            } else if self.tree.is(node, "br") {
                out.push('\n');
            }
        }
    }

    fn metadata(&self, table: NodeId) -> Metadata {
        let mut metadata = Metadata::new();
        let Some(element) = self.tree.element(table) else {
            return metadata;
        };

        metadata.insert(
            "id".to_string(),
            Value::from(element.attr("id").unwrap_or("")),
        );
        let classes: Vec<Value> = element
            .attr("class")
            .unwrap_or("")
            .split_whitespace()
            .map(Value::from)
            .collect();
        metadata.insert("class".to_string(), Value::Array(classes));

        let data_attrs: Map<String, Value> = element
            .attrs
            .iter()
            .filter(|(k, _)| k.starts_with("data-"))
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect();
        metadata.insert("data_attrs".to_string(), Value::Object(data_attrs));

        metadata
    }
}
