//! Table types.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified
    Justify,
}

impl Alignment {
    /// Map a CSS `text-align` keyword, defaulting to left.
    pub fn from_css(value: Option<&str>) -> Self {
        match value {
            Some("center") => Alignment::Center,
            Some("right") => Alignment::Right,
            Some("justify") => Alignment::Justify,
            _ => Alignment::Left,
        }
    }

    /// CSS keyword for this alignment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether the row sits inside a `thead`
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Number of grid columns the row occupies (sum of colspans).
    pub fn virtual_columns(&self) -> usize {
        self.cells.iter().map(|c| c.colspan).sum()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text; lines separated by `\n`
    pub content: String,

    /// Number of columns this cell spans (at least 1)
    pub colspan: usize,

    /// Number of rows this cell spans (at least 1, informational)
    pub rowspan: usize,

    /// Cell alignment
    pub align: Alignment,

    /// Whether the content starts with a dollar sign
    pub is_currency: bool,
}

impl TableCell {
    /// Create a left-aligned single cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        let content = text.into();
        Self {
            is_currency: content.starts_with('$'),
            content,
            colspan: 1,
            rowspan: 1,
            align: Alignment::Left,
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: usize) -> Self {
        self.colspan = span.max(1);
        self
    }

    /// Set rowspan and return self.
    pub fn rowspan(mut self, span: usize) -> Self {
        self.rowspan = span.max(1);
        self
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.align = alignment;
        self
    }

    /// Set the currency flag and return self.
    pub fn currency(mut self, is_currency: bool) -> Self {
        self.is_currency = is_currency;
        self
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.rowspan > 1 || self.colspan > 1
    }
}
