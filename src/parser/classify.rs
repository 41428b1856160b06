//! Element classification heuristics.
//!
//! Filing markup rarely uses semantic tags, so whether an element is a block,
//! an inline run or a heading is decided from its tag and resolved style.
//! The thresholds are empirical; changing them changes classification output.

use super::css::floats_left;
use crate::dom::{Element, NodeId, Tree};
use crate::model::StyleInfo;

/// Tags that start a new block unless styled otherwise.
const BLOCK_TAGS: &[&str] = &[
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "pre",
    "hr",
    "table",
    "form",
    "fieldset",
    "address",
];

/// Tags that flow within surrounding text.
const INLINE_TAGS: &[&str] = &[
    "span", "font", "b", "strong", "i", "em", "a", "sub", "sup", "u", "small", "mark",
];

/// Tags whose presence inside an element rules out a heading.
const STRUCTURAL_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p"];

const HEADING_MIN_MARGIN_TOP: f64 = 18.0;
const HEADING_MAX_WORDS: usize = 8;
const HEADING_MIN_FONT_RATIO: f64 = 1.2;
const HEADING_MIN_SIGNALS: usize = 4;

/// Check whether an element is block-level.
///
/// An explicit `display` decides on its own; otherwise the tag decides, except
/// that a left-floated element is never a block.
pub fn is_block_element(element: &Element, style: &StyleInfo) -> bool {
    if let Some(display) = style.display.as_deref() {
        return display != "inline";
    }
    BLOCK_TAGS.contains(&element.name.as_str()) && !floats_left(element.style_attr())
}

/// Check whether an element is inline.
pub fn is_inline_element(element: &Element, style: &StyleInfo) -> bool {
    if style.display.as_deref() == Some("inline") {
        return true;
    }
    INLINE_TAGS.contains(&element.name.as_str())
}

/// Decide whether an element styled like body text is really a heading.
///
/// Bold weight is mandatory, and at least four of six signals must hold: bold,
/// a large top margin, at most eight words, no nested table, no nested heading
/// or paragraph, and a font at least 1.2 times the base size. Elements with a
/// nested `span` or without text never qualify.
pub fn looks_like_heading(tree: &Tree, id: NodeId, style: &StyleInfo, base_font_size: f64) -> bool {
    if tree.find(id, "span").is_some() {
        return false;
    }

    let text = tree.text_content(id);
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let is_bold = style.is_bold();
    let signals = [
        is_bold,
        style
            .margin_top
            .is_some_and(|m| m > HEADING_MIN_MARGIN_TOP),
        text.split_whitespace().count() <= HEADING_MAX_WORDS,
        tree.find(id, "table").is_none(),
        !tree
            .descendants(id)
            .any(|d| tree.name(d).is_some_and(|n| STRUCTURAL_TAGS.contains(&n))),
        style
            .font_size
            .is_some_and(|size| size >= HEADING_MIN_FONT_RATIO * base_font_size),
    ];

    is_bold && signals.iter().filter(|&&s| s).count() >= HEADING_MIN_SIGNALS
}

/// Heading level implied by font size relative to the base size.
///
/// Falls back to level 3 for bold text and level 4 otherwise.
pub fn heading_level(style: &StyleInfo, base_font_size: f64) -> u8 {
    if let Some(size) = style.font_size {
        let ratio = size / base_font_size;
        if ratio >= 1.8 {
            return 1;
        } else if ratio >= 1.4 {
            return 2;
        } else if ratio >= 1.2 {
            return 3;
        }
    }

    if style.is_bold() {
        3
    } else {
        4
    }
}
