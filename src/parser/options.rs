//! Parsing options and configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that stops a running parse when set.
pub type CancelFlag = Arc<AtomicBool>;

/// Default base font size in points, used by the heading heuristics.
pub const DEFAULT_BASE_FONT_SIZE: f64 = 10.0;

/// Default limit on element nesting.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for building a document model.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Font size that heading ratios are measured against
    pub base_font_size: f64,

    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Whether to merge adjacent compatible text blocks
    pub merge_adjacent: bool,

    /// Whether table-free `div`s styled like headings become headings
    pub detect_div_headings: bool,

    /// Cooperative cancellation flag
    pub cancel: Option<CancelFlag>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base font size.
    pub fn with_base_font_size(mut self, size: f64) -> Self {
        self.base_font_size = size;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail when the depth limit is exceeded.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip subtrees beyond the depth limit.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enable or disable merging of adjacent text blocks.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge_adjacent = merge;
        self
    }

    /// Enable or disable heading detection on `div` elements.
    pub fn with_div_headings(mut self, detect: bool) -> Self {
        self.detect_div_headings = detect;
        self
    }

    /// Set a cancellation flag.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Check whether the cancellation flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            base_font_size: DEFAULT_BASE_FONT_SIZE,
            error_mode: ErrorMode::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
            merge_adjacent: true,
            detect_div_headings: false,
            cancel: None,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Skip offending content and continue
    #[default]
    Lenient,
}
