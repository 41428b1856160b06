//! Text extraction and normalization helpers.

use std::sync::LazyLock;

use regex::Regex;

use super::css::parse_style;
use crate::dom::{NodeId, Tree};
use crate::model::StyleInfo;

static EXCESS_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("hardcoded break regex is valid"));

/// Entities substituted in all extracted text.
const TEXT_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#8202;", " "),
    ("&#8203;", ""),
    ("\u{a0}", " "),
    ("\u{200a}", " "),
    ("\u{200b}", ""),
];

/// Dash entities and characters, substituted in table cells.
///
/// Em-dash family maps to five hyphens and en-dash to three so renderers can
/// tell rule widths apart.
const DASH_ENTITIES: &[(&str, &str)] = &[
    ("&horbar;", "-----"),
    ("&mdash;", "-----"),
    ("&ndash;", "---"),
    ("&minus;", "-"),
    ("&hyphen;", "-"),
    ("&dash;", "-"),
    ("&#8208;", "-"),
    ("&#8209;", "-"),
    ("&#8210;", "-"),
    ("&#8211;", "---"),
    ("&#8212;", "-----"),
    ("&#8213;", "-----"),
    ("&#8722;", "-"),
    ("&#x2010;", "-"),
    ("&#x2011;", "-"),
    ("&#x2012;", "-"),
    ("&#x2013;", "---"),
    ("&#x2014;", "-----"),
    ("&#x2015;", "-----"),
    ("&#x2212;", "-"),
    ("\u{2010}", "-"),
    ("\u{2011}", "-"),
    ("\u{2012}", "-"),
    ("\u{2013}", "---"),
    ("\u{2014}", "-----"),
    ("\u{2015}", "-----"),
    ("\u{2212}", "-"),
];

/// Tags whose text is pulled into a paragraph.
const PARAGRAPH_INLINE_TAGS: &[&str] = &["span", "font", "strong", "em", "b", "i", "a"];

/// A fragment of text with the style it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    /// Text content; a lone `\n` marks a line break
    pub content: String,

    /// Style in effect for the fragment
    pub style: StyleInfo,

    /// Whether the fragment came from a `<p>` element
    pub is_paragraph: bool,
}

impl StyledText {
    /// Create a fragment.
    pub fn new(content: impl Into<String>, style: StyleInfo, is_paragraph: bool) -> Self {
        Self {
            content: content.into(),
            style,
            is_paragraph,
        }
    }

    /// A line break marker.
    pub fn line_break(style: StyleInfo, is_paragraph: bool) -> Self {
        Self::new("\n", style, is_paragraph)
    }

    /// Check whether this fragment is a line break marker.
    pub fn is_break(&self) -> bool {
        self.content == "\n"
    }
}

/// Replace common HTML entities and invisible spacing characters.
pub fn clean_entities(text: &str) -> String {
    replace_all(text, TEXT_ENTITIES)
}

/// Replace entities for table cell text, including dash variants.
pub fn clean_cell_entities(text: &str) -> String {
    replace_all(&replace_all(text, DASH_ENTITIES), TEXT_ENTITIES)
}

fn replace_all(text: &str, table: &[(&str, &str)]) -> String {
    let mut result = text.to_string();
    for (from, to) in table {
        if result.contains(from) {
            result = result.replace(from, to);
        }
    }
    result
}

/// Collapse runs of whitespace within each line, keep single line breaks and
/// reduce three or more consecutive breaks to two.
pub fn normalize_whitespace(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(collapse_spaces).collect();
    EXCESS_BREAKS
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace per line and drop empty lines.
pub fn normalize_lines(text: &str) -> String {
    text.split('\n')
        .map(collapse_spaces)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join buffered fragments into final text.
///
/// Paragraph fragments are concatenated as-is and normalized line by line with
/// empty lines dropped. Other fragments are joined with spaces and go through
/// [`normalize_whitespace`].
pub fn normalize_pieces(pieces: &[StyledText]) -> String {
    let Some(first) = pieces.first() else {
        return String::new();
    };
    let text = if first.is_paragraph {
        let joined: String = pieces.iter().map(|p| p.content.as_str()).collect();
        normalize_lines(&joined)
    } else {
        let joined = pieces
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        normalize_whitespace(&joined)
    };
    clean_entities(&text)
}

/// Extract text from an element, keeping meaningful spacing.
///
/// Whitespace-only text after real text becomes a single space, `<br>` becomes
/// a line break and nested tables contribute nothing.
pub fn text_with_spacing(tree: &Tree, id: NodeId) -> String {
    if tree.is(id, "table") {
        return String::new();
    }

    // One frame per open element; a finished frame's text is handed to its parent.
    let mut stack = vec![SpacingFrame::new(id)];
    while let Some(frame) = stack.last_mut() {
        let Some(&child) = tree.children(frame.id).get(frame.next) else {
            let Some(done) = stack.pop() else { break };
            let text = done.texts.concat();
            match stack.last_mut() {
                Some(parent) => parent.push_element_text(&text),
                None => return text,
            }
            continue;
        };
        frame.next += 1;

        if let Some(text) = tree.text(child) {
            frame.push_text(text);
            continue;
        }
        match tree.name(child) {
            Some("br") => {
                frame.texts.push("\n".to_string());
                frame.last_was_text = false;
            }
            Some("table") | None => {}
            Some(_) => stack.push(SpacingFrame::new(child)),
        }
    }

    String::new()
}

/// Partial output of [`text_with_spacing`] for one element.
struct SpacingFrame {
    id: NodeId,
    next: usize,
    texts: Vec<String>,
    last_was_text: bool,
}

impl SpacingFrame {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            next: 0,
            texts: Vec::new(),
            last_was_text: false,
        }
    }

    fn push_text(&mut self, text: &str) {
        let stripped = text.trim();
        if !stripped.is_empty() {
            self.texts.push(stripped.to_string());
            self.last_was_text = true;
        } else if !text.is_empty() && self.last_was_text {
            self.texts.push(" ".to_string());
        }
    }

    fn push_element_text(&mut self, child_text: &str) {
        let stripped = child_text.trim();
        if stripped.is_empty() {
            return;
        }
        let needs_space = self.last_was_text
            && self.texts.last().is_some_and(|t| !t.ends_with(' '))
            && !child_text.starts_with(' ');
        if needs_space {
            self.texts.push(" ".to_string());
        }
        self.texts.push(stripped.to_string());
        self.last_was_text = true;
    }
}

/// Collect paragraph fragments from the children of a `<p>` element.
///
/// Real text is kept verbatim, whitespace between two real fragments becomes a
/// single space, `<br>` forces a break and inline formatting tags contribute
/// their spaced text. Other children are skipped.
pub fn paragraph_pieces(tree: &Tree, id: NodeId, style: &StyleInfo) -> Vec<StyledText> {
    let mut pieces = Vec::new();
    let mut last_was_text = false;

    for &child in tree.children(id) {
        if let Some(text) = tree.text(child) {
            if !text.trim().is_empty() {
                pieces.push(StyledText::new(text, style.clone(), true));
                last_was_text = true;
            } else if !text.is_empty() && last_was_text {
                pieces.push(StyledText::new(" ", style.clone(), true));
            }
            continue;
        }
        let Some(name) = tree.name(child) else {
            continue;
        };
        if name == "br" {
            pieces.push(StyledText::line_break(style.clone(), true));
            last_was_text = false;
        } else if PARAGRAPH_INLINE_TAGS.contains(&name) {
            let text = text_with_spacing(tree, child);
            let stripped = text.trim();
            if !stripped.is_empty() {
                let child_style = combined_style(tree, child, style);
                pieces.push(StyledText::new(stripped, child_style, true));
                last_was_text = true;
            }
        }
    }

    pieces
}

/// Collect every text fragment below an element with its cascaded style.
///
/// Tables are skipped; `<br>` produces a break marker.
pub fn collect_styled_text(tree: &Tree, id: NodeId, style: &StyleInfo) -> Vec<StyledText> {
    let mut pieces = Vec::new();
    let mut stack: Vec<(NodeId, StyleInfo, usize)> = vec![(id, style.clone(), 0)];

    while let Some((current, style, next)) = stack.last_mut() {
        let Some(&child) = tree.children(*current).get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;

        if let Some(text) = tree.text(child) {
            if !text.trim().is_empty() {
                pieces.push(StyledText::new(text, style.clone(), false));
            }
            continue;
        }
        match tree.name(child) {
            Some("br") => pieces.push(StyledText::line_break(style.clone(), false)),
            Some("table") | None => {}
            Some(_) => {
                let child_style = combined_style(tree, child, style);
                stack.push((child, child_style, 0));
            }
        }
    }

    pieces
}

/// Cascade an element's inline style over `parent`, honouring presentational
/// tags: `<b>`/`<strong>` imply bold and `<font size>` sets the font size.
pub fn combined_style(tree: &Tree, id: NodeId, parent: &StyleInfo) -> StyleInfo {
    let Some(element) = tree.element(id) else {
        return parent.clone();
    };
    let mut style = parse_style(element.style_attr());

    match element.name.as_str() {
        "font" => {
            if let Some(size) = element
                .attr("size")
                .and_then(|s| s.replace("pt", "").trim().parse::<f64>().ok())
            {
                style.font_size = Some(size);
            }
        }
        "b" | "strong" => style.font_weight = Some("bold".to_string()),
        _ => {}
    }

    style.merge(Some(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn paragraph(tree: &mut Tree) -> NodeId {
        let root = tree.root();
        tree.append_element(root, Element::new("p"))
    }

    #[test]
    fn test_clean_entities() {
        assert_eq!(clean_entities("A&nbsp;&amp;&nbsp;B"), "A & B");
        assert_eq!(clean_entities("x&#8203;y"), "xy");
        assert_eq!(clean_entities("a\u{a0}b"), "a b");
        assert_eq!(clean_entities("&mdash;"), "&mdash;");
    }

    #[test]
    fn test_clean_cell_entities_dashes() {
        assert_eq!(clean_cell_entities("&mdash;"), "-----");
        assert_eq!(clean_cell_entities("&ndash;"), "---");
        assert_eq!(clean_cell_entities("&#8212;"), "-----");
        assert_eq!(clean_cell_entities("&#x2013;"), "---");
        assert_eq!(clean_cell_entities("&minus;5"), "-5");
        assert_eq!(clean_cell_entities("\u{2014}"), "-----");
        assert_eq!(clean_cell_entities("\u{2013}"), "---");
        assert_eq!(clean_cell_entities("1&nbsp;&amp;&nbsp;2"), "1 & 2");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a   b \n c  "), "a b\nc");
        assert_eq!(normalize_whitespace("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_normalize_lines() {
        assert_eq!(normalize_lines("Hello   world\n\n  second\tline "), "Hello world\nsecond line");
    }

    #[test]
    fn test_normalize_pieces() {
        let style = StyleInfo::default();
        let block = vec![
            StyledText::new("Item", style.clone(), false),
            StyledText::line_break(style.clone(), false),
            StyledText::new("Next", style.clone(), false),
        ];
        assert_eq!(normalize_pieces(&block), "Item\nNext");

        let para = vec![
            StyledText::new("Hello ", style.clone(), true),
            StyledText::new("world", style.clone(), true),
            StyledText::line_break(style.clone(), true),
            StyledText::line_break(style.clone(), true),
            StyledText::new("  again", style, true),
        ];
        assert_eq!(normalize_pieces(&para), "Hello world\nagain");
        assert_eq!(normalize_pieces(&[]), "");
    }

    #[test]
    fn test_text_with_spacing() {
        let mut tree = Tree::new();
        let p = paragraph(&mut tree);
        tree.append_text(p, "Total");
        tree.append_text(p, " ");
        let b = tree.append_element(p, Element::new("b"));
        tree.append_text(b, "assets");
        tree.append_element(p, Element::new("br"));
        let span = tree.append_element(p, Element::new("span"));
        tree.append_text(span, " net ");
        let table = tree.append_element(p, Element::new("table"));
        tree.append_text(table, "hidden");
        assert_eq!(text_with_spacing(&tree, p), "Total assets\nnet");
        assert_eq!(text_with_spacing(&tree, table), "");
    }

    #[test]
    fn test_text_with_spacing_adjacent_elements() {
        let mut tree = Tree::new();
        let div = paragraph(&mut tree);
        tree.append_text(div, "Net");
        let span = tree.append_element(div, Element::new("span"));
        tree.append_text(span, "income");
        assert_eq!(text_with_spacing(&tree, div), "Net income");
    }

    #[test]
    fn test_paragraph_pieces_skip_edge_whitespace() {
        let mut tree = Tree::new();
        let p = paragraph(&mut tree);
        tree.append_text(p, "  ");
        tree.append_text(p, "Hello");
        tree.append_text(p, " ");
        let b = tree.append_element(p, Element::new("b"));
        tree.append_text(b, "world");
        let sup = tree.append_element(p, Element::new("sup"));
        tree.append_text(sup, "1");
        let pieces = paragraph_pieces(&tree, p, &StyleInfo::default());
        let contents: Vec<&str> = pieces.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["Hello", " ", "world"]);
        assert!(pieces.iter().all(|p| p.is_paragraph));
        assert!(pieces[2].style.is_bold());
    }

    #[test]
    fn test_collect_styled_text() {
        let mut tree = Tree::new();
        let div = tree.append_element(tree.root(), Element::new("div"));
        tree.append_text(div, "Plain");
        let font = tree.append_element(div, Element::new("font").with_attr("size", "12pt"));
        let strong = tree.append_element(font, Element::new("strong"));
        tree.append_text(strong, "Loud");
        tree.append_element(div, Element::new("br"));
        let table = tree.append_element(div, Element::new("table"));
        tree.append_text(table, "skipped");

        let pieces = collect_styled_text(&tree, div, &StyleInfo::default());
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].content, "Plain");
        assert!(!pieces[0].style.is_bold());
        assert_eq!(pieces[1].content, "Loud");
        assert!(pieces[1].style.is_bold());
        assert_eq!(pieces[1].style.font_size, Some(12.0));
        assert!(pieces[2].is_break());
    }

    #[test]
    fn test_deeply_nested_text() {
        let mut tree = Tree::new();
        let div = tree.append_element(tree.root(), Element::new("div"));
        tree.append_text(div, "head");
        let mut parent = div;
        for _ in 0..20_000 {
            parent = tree.append_element(parent, Element::new("span"));
        }
        tree.append_text(parent, " deep ");

        assert_eq!(text_with_spacing(&tree, div), "head deep");
        let pieces = collect_styled_text(&tree, div, &StyleInfo::default());
        let contents: Vec<&str> = pieces.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["head", " deep "]);
    }
}
