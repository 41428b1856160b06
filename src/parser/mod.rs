//! Document building from element trees.
//!
//! The pieces are layered leaves first: inline CSS parsing, text helpers and
//! classification heuristics feed the table reconstructor and the recursive
//! [`HtmlParser`], whose output goes through the adjacent-block merger.

mod builder;
mod classify;
mod css;
mod merge;
mod options;
mod table;
mod text;

pub use builder::HtmlParser;
pub use classify::{heading_level, is_block_element, is_inline_element, looks_like_heading};
pub use css::{parse_dimension, parse_style, parse_width};
pub use merge::{merge_adjacent_nodes, merge_styles};
pub use options::{CancelFlag, ErrorMode, ParseOptions, DEFAULT_BASE_FONT_SIZE, DEFAULT_MAX_DEPTH};
pub use table::TableBuilder;
pub use text::{
    clean_cell_entities, clean_entities, collect_styled_text, combined_style, normalize_pieces,
    normalize_whitespace, paragraph_pieces, text_with_spacing, StyledText,
};
