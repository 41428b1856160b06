//! Tree construction from raw HTML.
//!
//! Tag-soup repair and entity decoding are left to html5ever (via `scraper`);
//! this adapter copies the result into a [`Tree`] and strips content that never
//! belongs in the document model.

use scraper::{Html, Node};

use super::{Element, Tree};

/// Elements dropped together with their whole subtree.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

impl Tree {
    /// Parse an HTML document into a tree.
    ///
    /// The result always has an `html` element with `head` and `body`
    /// children, since html5ever synthesizes them when missing.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut tree = Tree::new();

        // Source nodes paired with their destination parent, popped in
        // document order.
        let mut stack = vec![(*document.root_element(), tree.root())];
        while let Some((source, parent)) = stack.pop() {
            match source.value() {
                Node::Text(text) => {
                    tree.append_text(parent, &**text);
                }
                Node::Element(el) => {
                    if STRIPPED_ELEMENTS.contains(&el.name()) {
                        continue;
                    }
                    let id = tree.append_element(parent, copy_element(el));
                    let children: Vec<_> = source.children().collect();
                    stack.extend(children.into_iter().rev().map(|child| (child, id)));
                }
                // Comments, doctypes and processing instructions carry no content.
                _ => {}
            }
        }

        tree
    }
}

fn copy_element(source: &scraper::node::Element) -> Element {
    Element {
        name: source.name().to_ascii_lowercase(),
        attrs: source
            .attrs()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect(),
    }
}
