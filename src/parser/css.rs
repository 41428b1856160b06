//! Inline CSS parsing.
//!
//! Only a fixed subset of properties is understood. Unknown keys and values
//! that cannot be parsed are ignored rather than reported.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{StyleInfo, Unit, Width};

/// Leading signed decimal number followed by optional unit letters.
static NUMBER_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d*\.?\d+)([a-z]*)").expect("hardcoded number/unit regex is valid")
});

/// Parse an inline `style` attribute.
pub fn parse_style(style: &str) -> StyleInfo {
    let mut info = StyleInfo::default();

    for prop in style.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = prop.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim().to_lowercase();

        match key.as_str() {
            "width" => {
                if let Some(width) = parse_width(&value) {
                    info.width = Some(width);
                }
            }
            "display" => info.display = Some(value),
            "margin-top" => info.margin_top = parse_dimension(&value),
            "margin-bottom" => info.margin_bottom = parse_dimension(&value),
            "font-size" => info.font_size = parse_dimension(&value),
            "font-weight" => info.font_weight = Some(value),
            "text-align" => info.text_align = Some(value),
            "line-height" => info.line_height = parse_dimension(&value),
            "text-decoration" => info.text_decoration = Some(value),
            _ => {}
        }
    }

    info
}

/// Parse a CSS width value.
///
/// A bare number is taken as pixels. Units outside the supported set yield
/// `None`.
pub fn parse_width(value: &str) -> Option<Width> {
    if value.is_empty() {
        return None;
    }

    if let Some(number) = value.strip_suffix('%') {
        return number
            .trim()
            .parse::<f64>()
            .ok()
            .map(|v| Width::new(v, Unit::Percent));
    }

    let (number, suffix) = split_number_unit(value)?;
    let unit = Unit::from_suffix(suffix)?;
    Some(Width::new(number, unit))
}

/// Parse a CSS length into an approximate character count.
///
/// Percentages come back as a 0-1 fraction. Unknown units count one
/// character per unit.
pub fn parse_dimension(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }

    if let Some(number) = value.strip_suffix('%') {
        return number.trim().parse::<f64>().ok().map(|v| v / 100.0);
    }

    let (number, suffix) = split_number_unit(value)?;
    let chars_per_unit = match suffix {
        "in" => 12.3,
        "pt" => 12.3 / 72.0,
        "px" => 12.3 / 96.0,
        "cm" => 4.84,
        "mm" => 0.484,
        "em" | "rem" => 1.6,
        _ => 1.0,
    };
    Some((number * chars_per_unit).trunc())
}

fn split_number_unit(value: &str) -> Option<(f64, &str)> {
    let caps = NUMBER_UNIT.captures(value)?;
    let number = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2).map_or("", |m| m.as_str());
    Some((number, unit))
}

/// Check whether a raw style attribute declares `float: left`.
pub fn floats_left(style: &str) -> bool {
    declares(style, "float", "left")
}

/// Check whether a raw style attribute declares `clear: both`.
pub fn clears_both(style: &str) -> bool {
    declares(style, "clear", "both")
}

fn declares(style: &str, property: &str, expected: &str) -> bool {
    style.split(';').any(|prop| {
        prop.split_once(':').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case(property) && value.trim().eq_ignore_ascii_case(expected)
        })
    })
}
