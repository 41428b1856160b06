//! Coalescing of text blocks that the source markup split apart.

use crate::model::{Node, NodeKind, StyleInfo, Width};

/// A width below this fraction of its neighbour's is treated as a marker
/// (bullet column, indent cell) and loses the merge.
const MARKER_WIDTH_RATIO: f64 = 0.3;

/// Combine the styles of two consecutive blocks.
///
/// Returns `None` when the blocks disagree on `text-align`, which rules out
/// merging them. The first block contributes its top margin and the second its
/// bottom margin; a font size or weight that changes in the second block wins.
pub fn merge_styles(first: &StyleInfo, second: &StyleInfo) -> Option<StyleInfo> {
    if first.text_align != second.text_align {
        return None;
    }

    Some(StyleInfo {
        display: second.display.clone().or_else(|| first.display.clone()),
        margin_top: first.margin_top,
        margin_bottom: second.margin_bottom,
        font_size: match second.font_size {
            Some(size) if first.font_size != Some(size) => Some(size),
            _ => first.font_size,
        },
        font_weight: match &second.font_weight {
            Some(weight) if first.font_weight.as_ref() != Some(weight) => Some(weight.clone()),
            _ => first.font_weight.clone(),
        },
        text_align: first.text_align.clone(),
        line_height: second.line_height.or(first.line_height),
        width: merge_widths(first.width, second.width),
        text_decoration: second
            .text_decoration
            .clone()
            .or_else(|| first.text_decoration.clone()),
    })
}

fn merge_widths(first: Option<Width>, second: Option<Width>) -> Option<Width> {
    match (first, second) {
        (Some(w1), Some(w2)) => {
            let (px1, px2) = (w1.to_pixels(), w2.to_pixels());
            let first_is_marker = px1 < px2 * MARKER_WIDTH_RATIO;
            if !first_is_marker && px2 < px1 * MARKER_WIDTH_RATIO {
                Some(w1)
            } else {
                // Comparable widths go to the second block.
                Some(w2)
            }
        }
        (first, second) => second.or(first),
    }
}

fn mergeable(first: &Node, second: &Node) -> Option<StyleInfo> {
    let both_text = first.kind() == NodeKind::TextBlock && second.kind() == NodeKind::TextBlock;
    if !both_text || !first.metadata().is_empty() || !second.metadata().is_empty() {
        return None;
    }
    merge_styles(first.style(), second.style())
}

/// Merge runs of compatible text blocks in a single forward pass.
///
/// Two neighbours merge when both are metadata-free text blocks with
/// compatible styles; the result keeps absorbing following blocks while they
/// stay compatible. Merged text joins the parts with a blank line.
pub fn merge_adjacent_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let input_len = nodes.len();
    let mut merged: Vec<Node> = Vec::with_capacity(input_len);
    let mut iter = nodes.into_iter();

    let Some(mut current) = iter.next() else {
        return merged;
    };

    for node in iter {
        let combined = mergeable(&current, &node).and_then(|style| {
            let (Ok(a), Ok(b)) = (current.text(), node.text()) else {
                return None;
            };
            Some(Node::text_block(format!("{a}\n\n{b}"), style))
        });

        match combined {
            Some(block) => current = block,
            None => merged.push(std::mem::replace(&mut current, node)),
        }
    }
    merged.push(current);

    log::debug!("merge_adjacent_nodes: {} -> {} nodes", input_len, merged.len());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableRow, Unit};

    fn aligned(align: &str) -> StyleInfo {
        StyleInfo {
            text_align: Some(align.into()),
            ..Default::default()
        }
    }

    fn with_width(value: f64, unit: Unit) -> StyleInfo {
        StyleInfo {
            width: Some(Width::new(value, unit)),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_styles_text_align_veto() {
        assert!(merge_styles(&aligned("left"), &aligned("center")).is_none());
        assert!(merge_styles(&aligned("left"), &StyleInfo::new()).is_none());
        assert_eq!(
            merge_styles(&aligned("left"), &aligned("left")).unwrap().text_align.as_deref(),
            Some("left")
        );
    }

    #[test]
    fn test_merge_styles_margins_and_fonts() {
        let first = StyleInfo {
            margin_top: Some(1.0),
            margin_bottom: Some(2.0),
            font_size: Some(10.0),
            font_weight: Some("bold".into()),
            line_height: Some(1.0),
            ..Default::default()
        };
        let second = StyleInfo {
            margin_top: Some(3.0),
            font_size: Some(12.0),
            font_weight: Some("bold".into()),
            display: Some("block".into()),
            ..Default::default()
        };
        let merged = merge_styles(&first, &second).unwrap();
        assert_eq!(merged.margin_top, Some(1.0));
        assert_eq!(merged.margin_bottom, None);
        assert_eq!(merged.font_size, Some(12.0));
        assert_eq!(merged.font_weight.as_deref(), Some("bold"));
        assert_eq!(merged.display.as_deref(), Some("block"));
        assert_eq!(merged.line_height, Some(1.0));

        let plain = merge_styles(&first, &StyleInfo::new()).unwrap();
        assert_eq!(plain.font_size, Some(10.0));
    }

    #[test]
    fn test_merge_widths() {
        let bullet = with_width(5.0, Unit::Percent);
        let body = with_width(95.0, Unit::Percent);
        assert_eq!(merge_styles(&bullet, &body).unwrap().width, body.width);
        assert_eq!(merge_styles(&body, &bullet).unwrap().width, body.width);

        let inch = with_width(1.0, Unit::Inch);
        let points = with_width(80.0, Unit::Point);
        assert_eq!(merge_styles(&inch, &points).unwrap().width, points.width);

        assert_eq!(merge_styles(&inch, &StyleInfo::new()).unwrap().width, inch.width);
        assert_eq!(merge_styles(&StyleInfo::new(), &inch).unwrap().width, inch.width);
    }

    #[test]
    fn test_merge_adjacent_runs() {
        let nodes = vec![
            Node::text_block("A", aligned("left")),
            Node::text_block("B", aligned("left")),
            Node::text_block("C", aligned("left")),
            Node::text_block("D", aligned("center")),
        ];
        let merged = merge_adjacent_nodes(nodes);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text().unwrap(), "A\n\nB\n\nC");
        assert_eq!(merged[1].text().unwrap(), "D");
    }

    #[test]
    fn test_merge_skips_other_kinds_and_metadata() {
        let mut tagged = Node::text_block("tagged", StyleInfo::new());
        tagged.add_metadata("id", "x");
        let nodes = vec![
            Node::heading("H", StyleInfo::new(), 2),
            Node::text_block("A", StyleInfo::new()),
            Node::table(vec![TableRow::from_strings(["x"])], StyleInfo::new()),
            Node::text_block("B", StyleInfo::new()),
            tagged,
        ];
        assert_eq!(merge_adjacent_nodes(nodes).len(), 5);
        assert!(merge_adjacent_nodes(Vec::new()).is_empty());
    }
}
