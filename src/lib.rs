//! # filingdoc
//!
//! Document model extraction from SEC filing HTML.
//!
//! Filings mark structure with inline CSS rather than semantic tags: a bold,
//! large-font `<div>` is a heading, a right-aligned cell spanning three columns
//! holds a single figure. This library walks the markup, resolves the style
//! cascade and turns it into a flat, ordered sequence of headings, text blocks
//! and tables.
//!
//! ## Quick Start
//!
//! ```
//! use filingdoc::{parse_html, NodeKind};
//!
//! fn main() -> filingdoc::Result<()> {
//!     let html = r#"<html><body>
//!         <h2 style="font-size:14pt">Item 7. Management's Discussion</h2>
//!         <p>Revenue grew <b>12%</b> year over year.</p>
//!     </body></html>"#;
//!
//!     let doc = parse_html(html)?;
//!     assert_eq!(doc[0].kind(), NodeKind::Heading);
//!     assert_eq!(doc[1].text()?, "Revenue grew 12% year over year.");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style cascade**: inline CSS resolved down the tree, nearest ancestor wins
//! - **Heading heuristics**: bold, spacing and size signals on plain `div`s
//! - **Table reconstruction**: header rows, colspans and right-aligned splits
//! - **Block merging**: text the markup split apart is joined back up
//! - **Parallel batches**: many filings at once with Rayon
//!
//! The `html` feature (on by default) provides [`parse_html`] through the
//! `scraper` crate. Without it, build a [`dom::Tree`] yourself and use
//! [`parse_tree`].

pub mod dom;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use dom::{Element, NodeId, TableMarks, Tree};
pub use error::{Error, Result};
pub use export::{from_json, to_json, JsonFormat};
pub use model::{
    Alignment, Document, DocumentData, Metadata, Node, NodeContent, NodeKind, StyleInfo,
    TableCell, TableRow, Unit, Width,
};
pub use parser::{CancelFlag, ErrorMode, HtmlParser, ParseOptions};

#[cfg(feature = "html")]
use rayon::prelude::*;

/// Parse an element tree into a document with default options.
///
/// # Example
///
/// ```
/// use filingdoc::{parse_tree, Element, Tree};
///
/// let mut tree = Tree::new();
/// let body = tree.append_element(tree.root(), Element::new("body"));
/// let p = tree.append_element(body, Element::new("p"));
/// tree.append_text(p, "Hello");
///
/// let doc = parse_tree(&tree).unwrap();
/// assert_eq!(doc.len(), 1);
/// ```
pub fn parse_tree(tree: &Tree) -> Result<Document> {
    HtmlParser::new(tree).parse()
}

/// Parse an element tree with custom options.
pub fn parse_tree_with_options(tree: &Tree, options: ParseOptions) -> Result<Document> {
    HtmlParser::new(tree).with_options(options).parse()
}

/// Parse an HTML string into a document.
///
/// Malformed markup never fails: a document without `<body>` content comes
/// back empty.
///
/// # Example
///
/// ```
/// use filingdoc::parse_html;
///
/// let doc = parse_html("<p>Risk Factors</p>").unwrap();
/// assert_eq!(doc[0].text().unwrap(), "Risk Factors");
/// ```
#[cfg(feature = "html")]
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_options(html, ParseOptions::default())
}

/// Parse an HTML string with custom options.
///
/// # Example
///
/// ```
/// use filingdoc::{parse_html_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_div_headings(true)
///     .with_merge(false);
/// let doc = parse_html_with_options("<div>Text</div>", options).unwrap();
/// assert_eq!(doc.len(), 1);
/// ```
#[cfg(feature = "html")]
pub fn parse_html_with_options(html: &str, options: ParseOptions) -> Result<Document> {
    let tree = Tree::from_html(html);
    parse_tree_with_options(&tree, options)
}

/// Parse many HTML documents in parallel.
///
/// Each document gets its own tree and parser; results keep input order and
/// a failure in one document does not affect the others.
#[cfg(feature = "html")]
pub fn parse_batch(documents: &[&str], options: &ParseOptions) -> Vec<Result<Document>> {
    documents
        .par_iter()
        .map(|html| parse_html_with_options(html, options.clone()))
        .collect()
}

#[cfg(all(test, not(feature = "html")))]
mod tree_tests {
    use super::*;

    #[test]
    fn test_parse_tree_without_html_feature() {
        let mut tree = Tree::new();
        let body = tree.append_element(tree.root(), Element::new("body"));
        let p = tree.append_element(body, Element::new("p"));
        tree.append_text(p, "Plain tree");
        let doc = parse_tree(&tree).unwrap();
        assert_eq!(doc[0].text().unwrap(), "Plain tree");
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html_empty_input() {
        let doc = parse_html("").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_html_body_text_skipped() {
        // Text directly under <body> is not part of any block.
        let doc = parse_html("<body>loose text<p>kept</p></body>").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].text().unwrap(), "kept");
    }

    #[test]
    fn test_parse_batch_keeps_order() {
        let docs = ["<h1>One</h1>", "<p>Two</p>", "<table></table>"];
        let results = parse_batch(&docs, &ParseOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[0].text().unwrap(), "One");
        assert_eq!(results[1].as_ref().unwrap()[0].text().unwrap(), "Two");
        assert!(results[2].as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_parse_batch_independent_failures() {
        let deep = format!("{}x{}", "<section>".repeat(20), "</section>".repeat(20));
        let docs = [deep.as_str(), "<p>fine</p>"];
        let options = ParseOptions::new().strict().with_max_depth(8);
        let results = parse_batch(&docs, &options);
        assert!(matches!(results[0], Err(Error::DepthLimit(8))));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_parse_tree_matches_parse_html() {
        let html = "<body><div>A</div><div>B</div></body>";
        let tree = Tree::from_html(html);
        assert_eq!(parse_tree(&tree).unwrap(), parse_html(html).unwrap());
    }
}
