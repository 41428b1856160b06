//! Dimensional widths and cascading style properties.

use serde::{Deserialize, Serialize};

/// Console width the character conversion rates are calibrated for.
const BASE_CONSOLE_WIDTH: f64 = 80.0;

/// Characters per inch at the base console width.
const CHARS_PER_INCH: f64 = 12.3;

/// Font weights treated as bold.
const BOLD_WEIGHTS: &[&str] = &["bold", "700", "800", "900"];

/// CSS length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Points (1/72 inch)
    Point,
    /// Pixels (1/96 inch)
    Pixel,
    /// Inches
    Inch,
    /// Centimeters
    Centimeter,
    /// Millimeters
    Millimeter,
    /// Percentage of the container
    Percent,
}

impl Unit {
    /// Map a CSS unit suffix to a unit. An empty suffix means pixels.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "pt" => Some(Unit::Point),
            "px" | "" => Some(Unit::Pixel),
            "in" => Some(Unit::Inch),
            "cm" => Some(Unit::Centimeter),
            "mm" => Some(Unit::Millimeter),
            "%" => Some(Unit::Percent),
            _ => None,
        }
    }

    fn inches_per_unit(self) -> f64 {
        match self {
            Unit::Inch => 1.0,
            Unit::Point => 1.0 / 72.0,
            Unit::Pixel => 1.0 / 96.0,
            Unit::Centimeter => 0.393701,
            Unit::Millimeter => 0.0393701,
            // Handled separately in `to_chars`.
            Unit::Percent => 1.0,
        }
    }

    /// Approximate pixels per unit, used to compare widths across units.
    pub fn pixels_per_unit(self) -> f64 {
        match self {
            Unit::Pixel => 1.0,
            Unit::Point => 1.333,
            Unit::Inch => 96.0,
            Unit::Centimeter => 37.795,
            Unit::Millimeter => 3.7795,
            Unit::Percent => 1.0,
        }
    }
}

/// A width value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Width {
    /// Numeric value
    pub value: f64,

    /// Unit of the value
    pub unit: Unit,
}

impl Width {
    /// Create a new width.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to a character count for a console of the given width.
    ///
    /// Absolute units go through inches at 12.3 characters per inch on an
    /// 80-column console, scaled linearly with the console width. Percentages
    /// are taken of the console width directly. Halves round to even. The
    /// result never exceeds `console_width`.
    pub fn to_chars(&self, console_width: usize) -> usize {
        let console = console_width as f64;
        let chars = if self.unit == Unit::Percent {
            (console * (self.value / 100.0)).round_ties_even()
        } else {
            let scale = console / BASE_CONSOLE_WIDTH;
            (self.value * self.unit.inches_per_unit() * CHARS_PER_INCH * scale).round_ties_even()
        };
        // Negative widths have no meaning on a console.
        (chars.max(0.0) as usize).min(console_width)
    }

    /// Approximate size in pixels.
    pub fn to_pixels(&self) -> f64 {
        self.value * self.unit.pixels_per_unit()
    }
}

/// Resolved style properties of an element.
///
/// Every property is optional; `None` means "no opinion" and lets an ancestor's
/// value show through when styles are cascaded with [`StyleInfo::merge`].
/// Lengths other than `width` are stored as approximate character counts, with
/// percentages kept as a 0-1 fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// CSS `display` keyword
    pub display: Option<String>,

    /// Top margin
    pub margin_top: Option<f64>,

    /// Bottom margin
    pub margin_bottom: Option<f64>,

    /// Font size
    pub font_size: Option<f64>,

    /// CSS `font-weight` keyword or number
    pub font_weight: Option<String>,

    /// CSS `text-align` keyword
    pub text_align: Option<String>,

    /// Line height
    pub line_height: Option<f64>,

    /// Declared width
    pub width: Option<Width>,

    /// CSS `text-decoration` keyword
    pub text_decoration: Option<String>,
}

impl StyleInfo {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cascade this style over a parent style.
    ///
    /// Each property takes this style's value when present, else the parent's.
    pub fn merge(&self, parent: Option<&StyleInfo>) -> StyleInfo {
        let Some(parent) = parent else {
            return self.clone();
        };
        StyleInfo {
            display: self.display.clone().or_else(|| parent.display.clone()),
            margin_top: self.margin_top.or(parent.margin_top),
            margin_bottom: self.margin_bottom.or(parent.margin_bottom),
            font_size: self.font_size.or(parent.font_size),
            font_weight: self
                .font_weight
                .clone()
                .or_else(|| parent.font_weight.clone()),
            text_align: self.text_align.clone().or_else(|| parent.text_align.clone()),
            line_height: self.line_height.or(parent.line_height),
            width: self.width.or(parent.width),
            text_decoration: self
                .text_decoration
                .clone()
                .or_else(|| parent.text_decoration.clone()),
        }
    }

    /// Check whether the font weight is bold or heavier.
    pub fn is_bold(&self) -> bool {
        self.font_weight
            .as_deref()
            .is_some_and(|w| BOLD_WEIGHTS.contains(&w))
    }

    /// Declared width in characters, capped at the console width.
    pub fn char_width(&self, console_width: usize) -> Option<usize> {
        self.width
            .map(|w| w.to_chars(console_width).min(console_width))
    }
}
