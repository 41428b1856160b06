//! Document model types.
//!
//! The model is the output of parsing: a flat, ordered sequence of headings,
//! text blocks and tables, each carrying its resolved style. Rendering is left
//! to consumers.

mod document;
mod node;
mod style;
mod table;

pub use document::{Document, DocumentData};
pub use node::{Metadata, Node, NodeContent, NodeKind};
pub use style::{StyleInfo, Unit, Width};
pub use table::{Alignment, TableCell, TableRow};
