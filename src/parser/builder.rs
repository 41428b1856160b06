//! Recursive document builder.

use crate::dom::{NodeId, TableMarks, Tree};
use crate::error::{Error, Result};
use crate::model::{Document, DocumentData, Node, StyleInfo};

use super::classify::{heading_level, is_block_element, looks_like_heading};
use super::css::{clears_both, floats_left, parse_style};
use super::merge::merge_adjacent_nodes;
use super::options::{ErrorMode, ParseOptions};
use super::table::TableBuilder;
use super::text::{
    clean_entities, collect_styled_text, normalize_pieces, paragraph_pieces, text_with_spacing,
    StyledText,
};

const ZERO_WIDTH_SPACE: &str = "\u{200b}";

/// Builds a [`Document`] from an element tree.
///
/// The parser walks the children of `<body>`, cascading inline styles through
/// a stack with one frame per visited element. `div` elements are handled in
/// one of two modes: when a table sits anywhere below, text is buffered
/// between tables so they keep their position; otherwise inline content is
/// combined into as few text blocks as the markup allows.
///
/// A parser holds mutable traversal state and handles one tree at a time.
///
/// # Example
///
/// ```
/// use filingdoc::dom::{Element, Tree};
/// use filingdoc::HtmlParser;
///
/// let mut tree = Tree::new();
/// let body = tree.append_element(tree.root(), Element::new("body"));
/// let h1 = tree.append_element(body, Element::new("h1"));
/// tree.append_text(h1, "Annual Report");
///
/// let doc = HtmlParser::new(&tree).parse()?;
/// assert_eq!(doc[0].level(), Some(1));
/// # Ok::<(), filingdoc::Error>(())
/// ```
pub struct HtmlParser<'a> {
    tree: &'a Tree,
    options: ParseOptions,
    data: Option<DocumentData>,
    marks: TableMarks,
    style_stack: Vec<StyleInfo>,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser over a tree with default options.
    pub fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            options: ParseOptions::default(),
            data: None,
            marks: TableMarks::compute(tree),
            style_stack: Vec::new(),
        }
    }

    /// Set parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach document data to pass through to the result.
    pub fn with_data(mut self, data: DocumentData) -> Self {
        self.data = Some(data);
        self
    }

    /// Parse the tree into a document.
    ///
    /// A tree without `<body>` yields an empty document.
    pub fn parse(&mut self) -> Result<Document> {
        self.style_stack.clear();
        let tree = self.tree;

        let Some(body) = tree.find(tree.root(), "body") else {
            log::warn!("No body tag found in HTML");
            return Ok(Document::default().with_data(self.data.clone()));
        };

        let mut nodes = Vec::new();
        for &child in tree.children(body) {
            if tree.element(child).is_some() {
                nodes.extend(self.process_element(child)?);
            }
        }

        if self.options.merge_adjacent {
            nodes = merge_adjacent_nodes(nodes);
        }

        log::debug!("HtmlParser: built {} nodes", nodes.len());
        Ok(Document::new(nodes).with_data(self.data.clone()))
    }

    /// Run `f` with `style` pushed onto the cascade stack.
    ///
    /// The frame is popped whether `f` succeeds or fails. Cancellation and the
    /// depth limit are checked before the push.
    fn with_frame<F>(&mut self, style: StyleInfo, f: F) -> Result<Vec<Node>>
    where
        F: FnOnce(&mut Self, &StyleInfo) -> Result<Vec<Node>>,
    {
        if self.options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if self.style_stack.len() >= self.options.max_depth {
            return match self.options.error_mode {
                ErrorMode::Strict => Err(Error::DepthLimit(self.options.max_depth)),
                ErrorMode::Lenient => {
                    log::warn!(
                        "Skipping subtree nested deeper than {} elements",
                        self.options.max_depth
                    );
                    Ok(Vec::new())
                }
            };
        }

        self.style_stack.push(style.clone());
        let result = f(self, &style);
        self.style_stack.pop();
        result
    }

    fn process_element(&mut self, id: NodeId) -> Result<Vec<Node>> {
        let Some(element) = self.tree.element(id) else {
            return Ok(Vec::new());
        };
        let style = parse_style(element.style_attr()).merge(self.style_stack.last());
        self.with_frame(style, |this, style| this.dispatch(id, style))
    }

    fn dispatch(&mut self, id: NodeId, style: &StyleInfo) -> Result<Vec<Node>> {
        let tree = self.tree;
        let name = tree.name(id).unwrap_or_default();

        if name.starts_with("ix:") {
            return self.process_inline_xbrl(id, style);
        }

        match name {
            "table" => Ok(TableBuilder::new(tree).build(id).into_iter().collect()),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<u8>().unwrap_or(1);
                let text = clean_entities(tree.text_content(id).trim());
                Ok(vec![Node::heading(text, style.clone(), level)])
            }
            "p" => Ok(self.process_paragraph(id, style).into_iter().collect()),
            "div" if self.marks.has_table(id) => {
                log::debug!("HtmlParser: structure-preserving mode for div {}", id.index());
                self.process_structured_content(id, style)
            }
            "div" => {
                if self.options.detect_div_headings
                    && looks_like_heading(tree, id, style, self.options.base_font_size)
                {
                    let text = normalize_pieces(&collect_styled_text(tree, id, style));
                    let level = heading_level(style, self.options.base_font_size);
                    return Ok(vec![Node::heading(text, style.clone(), level)]);
                }
                self.process_inline_content(id, style)
            }
            _ => {
                let mut nodes = Vec::new();
                for &child in tree.children(id) {
                    nodes.extend(self.process_element(child)?);
                }
                Ok(nodes)
            }
        }
    }

    /// Unwrap an inline XBRL element (`ix:*`), handling its children as
    /// top-level content.
    fn process_inline_xbrl(&mut self, id: NodeId, style: &StyleInfo) -> Result<Vec<Node>> {
        let tree = self.tree;
        let mut nodes = Vec::new();

        for &child in tree.children(id) {
            match tree.name(child) {
                None => {}
                Some("table") => nodes.extend(TableBuilder::new(tree).build(child)),
                Some("p") => nodes.extend(self.process_paragraph(child, style)),
                Some("div") => {
                    let div_style = parse_style(tree.attr(child, "style").unwrap_or(""))
                        .merge(Some(style));
                    nodes.extend(self.process_structured_content(child, &div_style)?);
                }
                Some(_) => nodes.extend(self.process_element(child)?),
            }
        }

        Ok(nodes)
    }

    /// Paragraph assembly.
    fn process_paragraph(&self, id: NodeId, style: &StyleInfo) -> Option<Node> {
        let pieces = paragraph_pieces(self.tree, id, style);
        let text = normalize_pieces(&pieces);
        (!text.is_empty()).then(|| Node::text_block(text, style.clone()))
    }

    /// Structure-preserving traversal for elements with a table below them.
    fn process_structured_content(&mut self, id: NodeId, style: &StyleInfo) -> Result<Vec<Node>> {
        let tree = self.tree;
        let mut buffer = TextBuffer::new(style);

        for &child in tree.children(id) {
            if let Some(text) = tree.text(child) {
                buffer.push(text.trim());
                continue;
            }
            if tree.is(child, "table") {
                buffer.flush();
                buffer.nodes.extend(TableBuilder::new(tree).build(child));
            } else if self.marks.has_table(child) {
                buffer.flush();
                buffer.nodes.extend(self.process_element(child)?);
            } else {
                buffer.push(text_with_spacing(tree, child).trim());
            }
        }

        Ok(buffer.finish())
    }

    /// Content-combining traversal for table-free elements.
    fn process_inline_content(&mut self, id: NodeId, style: &StyleInfo) -> Result<Vec<Node>> {
        let tree = self.tree;
        let mut buffer = TextBuffer::new(style);

        for &child in tree.children(id) {
            if let Some(text) = tree.text(child) {
                let text = text.trim();
                if text != ZERO_WIDTH_SPACE {
                    buffer.push(text);
                }
                continue;
            }
            let Some(element) = tree.element(child) else {
                continue;
            };

            match element.name.as_str() {
                "br" => buffer.line_break(),
                "p" => {
                    buffer.flush();
                    let para_style = parse_style(element.style_attr()).merge(Some(style));
                    if let Some(node) = self.process_paragraph(child, &para_style) {
                        buffer.nodes.push(node);
                        buffer.ensure_break();
                    }
                }
                "font" => buffer.push(text_with_spacing(tree, child).trim()),
                "div" if floats_left(element.style_attr()) => {
                    let marker = tree.text_content(child);
                    let marker = marker.trim();
                    if !marker.is_empty() {
                        buffer.push(&format!("{marker} "));
                    }
                }
                "div" if clears_both(element.style_attr()) => buffer.ensure_break(),
                "div" => {
                    let child_style = parse_style(element.style_attr()).merge(Some(style));
                    let inner = self.with_frame(child_style, |this, style| {
                        this.process_inline_content(child, style)
                    })?;
                    if !inner.is_empty() {
                        buffer.flush();
                        buffer.nodes.extend(inner);
                    }
                }
                _ => {
                    if !is_block_element(element, &parse_style(element.style_attr())) {
                        buffer.push(text_with_spacing(tree, child).trim());
                    }
                }
            }
        }

        Ok(buffer.finish())
    }
}

/// Pending text fragments and finished nodes of one container.
struct TextBuffer<'s> {
    style: &'s StyleInfo,
    pieces: Vec<StyledText>,
    nodes: Vec<Node>,
}

impl<'s> TextBuffer<'s> {
    fn new(style: &'s StyleInfo) -> Self {
        Self {
            style,
            pieces: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn push(&mut self, text: &str) {
        if !text.is_empty() {
            self.pieces
                .push(StyledText::new(text, self.style.clone(), false));
        }
    }

    fn line_break(&mut self) {
        self.pieces
            .push(StyledText::line_break(self.style.clone(), false));
    }

    /// Add a line break unless the buffer is empty or already ends with one.
    fn ensure_break(&mut self) {
        if self.pieces.last().is_some_and(|p| !p.is_break()) {
            self.line_break();
        }
    }

    fn flush(&mut self) {
        if self.pieces.is_empty() {
            return;
        }
        let text = normalize_pieces(&self.pieces);
        if !text.is_empty() {
            self.nodes.push(Node::text_block(text, self.style.clone()));
        }
        self.pieces.clear();
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        self.nodes
    }
}
