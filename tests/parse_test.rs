//! Integration tests for parsing filing HTML into the document model.

#![cfg(feature = "html")]

use filingdoc::{
    from_json, parse_html, parse_html_with_options, parse_tree, to_json, Alignment, Element,
    Error, JsonFormat, NodeKind, ParseOptions, Tree,
};

const TEN_K_EXCERPT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>10-K</title>
  <style>td { padding: 0 }</style>
  <script>var tracking = 1;</script>
</head>
<body>
  <div style="font-weight:bold;margin-top:24pt;font-size:144pt">PART I</div>
  <h2 style="font-size:14pt">Item 1A. Risk Factors</h2>
  <p style="text-align:justify">Our business is subject to <b>numerous risks</b>.</p>
  <p style="text-align:justify">You should consider them carefully.</p>
  <div>
    <div style="float:left">&#8226;</div><div>Competition may reduce margins.</div>
    <div style="clear:both"></div>
  </div>
  <div id="financials">
    Selected data follows.
    <table id="tbl-7" class="fin summary" data-period="FY2024" style="width:100%">
      <thead><tr><th>Item</th><th>2024</th></tr></thead>
      <tr><td>Revenue</td><td style="text-align:right" colspan="3">$1,200</td></tr>
      <tr><td><div>Net</div><div>income</div></td><td>&mdash;</td></tr>
    </table>
    Amounts in thousands.
  </div>
</body>
</html>"#;

#[test]
fn test_end_to_end_scenario() {
    let html = r#"<body><h2 style="font-size:14pt">Title</h2><p>Hello <b>world</b></p><table><tr><td>A</td><td colspan="2" style="text-align:right">99%</td></tr></table></body>"#;
    let doc = parse_html(html).unwrap();

    assert_eq!(doc.len(), 3);

    assert_eq!(doc[0].kind(), NodeKind::Heading);
    assert_eq!(doc[0].level(), Some(2));
    assert_eq!(doc[0].text().unwrap(), "Title");

    assert_eq!(doc[1].kind(), NodeKind::TextBlock);
    assert_eq!(doc[1].text().unwrap(), "Hello world");

    assert_eq!(doc[2].kind(), NodeKind::Table);
    let rows = doc[2].rows().unwrap();
    assert_eq!(rows.len(), 1);
    let cells = &rows[0].cells;
    assert_eq!(cells.len(), 3);
    assert_eq!((cells[0].content.as_str(), cells[0].align), ("A", Alignment::Left));
    assert_eq!((cells[1].content.as_str(), cells[1].align), ("", Alignment::Right));
    assert_eq!((cells[2].content.as_str(), cells[2].align), ("99%", Alignment::Right));
    assert!(!cells[2].is_currency);
}

#[test]
fn test_filing_excerpt() {
    let doc = parse_html(TEN_K_EXCERPT).unwrap();
    let kinds: Vec<NodeKind> = doc.iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        [
            NodeKind::TextBlock,
            NodeKind::Heading,
            NodeKind::TextBlock,
            NodeKind::TextBlock,
            NodeKind::Table,
            NodeKind::TextBlock,
        ]
    );

    assert_eq!(doc[0].text().unwrap(), "PART I");
    assert_eq!(doc[1].text().unwrap(), "Item 1A. Risk Factors");
    assert_eq!(
        doc[2].text().unwrap(),
        "Our business is subject to numerous risks.\n\nYou should consider them carefully."
    );
    assert_eq!(
        doc[3].text().unwrap(),
        "\u{2022}\n\nCompetition may reduce margins.\n\nSelected data follows."
    );
    assert_eq!(doc[5].text().unwrap(), "Amounts in thousands.");
    assert!(!doc.plain_text().contains("tracking"));
}

#[test]
fn test_filing_excerpt_div_headings() {
    let options = ParseOptions::new().with_div_headings(true);
    let doc = parse_html_with_options(TEN_K_EXCERPT, options).unwrap();
    assert_eq!(doc[0].kind(), NodeKind::Heading);
    assert_eq!(doc[0].text().unwrap(), "PART I");
    assert_eq!(doc[0].level(), Some(1));
}

#[test]
fn test_filing_excerpt_table() {
    let doc = parse_html(TEN_K_EXCERPT).unwrap();
    let tables = doc.tables();
    assert_eq!(tables.len(), 1);
    let table = tables[0];

    let rows = table.rows().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_header);
    assert!(!rows[1].is_header);

    let revenue = &rows[1].cells;
    assert_eq!(revenue.len(), 4);
    assert_eq!(rows[1].virtual_columns(), 4);
    assert_eq!(revenue[3].content, "$1,200");
    assert!(!revenue[3].is_currency);

    assert_eq!(rows[2].cells[0].content, "Net\nincome");
    assert_eq!(rows[2].cells[1].content, "-----");

    assert_eq!(table.get_metadata("id").unwrap(), "tbl-7");
    assert_eq!(
        table.get_metadata("class").unwrap(),
        &serde_json::json!(["fin", "summary"])
    );
    assert_eq!(
        table.get_metadata("data_attrs").unwrap(),
        &serde_json::json!({"data-period": "FY2024"})
    );
    assert_eq!(table.style().char_width(80), Some(80));
}

#[test]
fn test_entity_dash_mapping_in_cells() {
    let html = "<table><tr><td>&mdash;</td><td>&ndash;</td><td>&#8212;</td><td>&minus;5</td></tr></table>";
    let doc = parse_html(html).unwrap();
    let cells: Vec<&str> = doc[0].rows().unwrap()[0]
        .cells
        .iter()
        .map(|c| c.content.as_str())
        .collect();
    assert_eq!(cells, ["-----", "---", "-----", "-5"]);
}

#[test]
fn test_cell_line_breaks() {
    let html = "<table><tr><td> Total<br>assets </td><td>$&nbsp;10</td></tr></table>";
    let doc = parse_html(html).unwrap();
    let cells = &doc[0].rows().unwrap()[0].cells;
    assert_eq!(cells[0].content, "Total\nassets");
    assert_eq!(cells[1].content, "$ 10");
    assert!(cells[1].is_currency);
}

#[test]
fn test_empty_table_suppressed() {
    let doc = parse_html("<table></table><table><tr></tr></table><p>after</p>").unwrap();
    assert_eq!(doc.len(), 1);
    assert!(doc.tables().is_empty());
}

#[test]
fn test_merge_text_align_veto() {
    let doc = parse_html(
        r#"<p>First</p><p>Second</p><p style="text-align:center">Third</p><p style="text-align:center">Fourth</p>"#,
    )
    .unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc[0].text().unwrap(), "First\n\nSecond");
    assert_eq!(doc[1].text().unwrap(), "Third\n\nFourth");

    let unmerged = parse_html_with_options(
        "<p>First</p><p>Second</p>",
        ParseOptions::new().with_merge(false),
    )
    .unwrap();
    assert_eq!(unmerged.len(), 2);
}

#[test]
fn test_inline_xbrl_unwrapped() {
    let html = r#"<body><ix:nonnumeric name="us-gaap:Policy"><div><span>Basis of presentation</span></div><table><tr><td>1</td></tr></table></ix:nonnumeric></body>"#;
    let doc = parse_html(html).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc[0].text().unwrap(), "Basis of presentation");
    assert!(doc[1].is_table());
}

#[test]
fn test_entities_in_text() {
    let doc = parse_html("<p>A&nbsp;&amp;&nbsp;B&#8203;</p>").unwrap();
    assert_eq!(doc[0].text().unwrap(), "A & B");
}

#[test]
fn test_missing_body_yields_empty_document() {
    let mut tree = Tree::new();
    let div = tree.append_element(tree.root(), Element::new("div"));
    tree.append_text(div, "no body here");
    assert!(parse_tree(&tree).unwrap().is_empty());
}

#[test]
fn test_strict_depth_limit() {
    let html = format!("{}<p>deep</p>{}", "<div>".repeat(40), "</div>".repeat(40));
    let result = parse_html_with_options(&html, ParseOptions::new().strict().with_max_depth(16));
    assert!(matches!(result, Err(Error::DepthLimit(16))));

    let doc = parse_html_with_options(&html, ParseOptions::new().with_max_depth(16)).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_deeply_nested_spans() {
    let html = format!(
        "<div>{}x{}</div>",
        "<span>".repeat(20_000),
        "</span>".repeat(20_000)
    );
    let doc = parse_html_with_options(&html, ParseOptions::new().strict()).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc[0].text().unwrap(), "x");
}

#[test]
fn test_json_export_round_trip() {
    let doc = parse_html(TEN_K_EXCERPT).unwrap();
    let json = to_json(&doc, JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"kind\": \"table\""));
    assert_eq!(from_json(&json).unwrap(), doc);
}
