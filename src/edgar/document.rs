// src/edgar/document.rs
use scraper::{node::Node, ElementRef, Html};

// Text under these never renders. `ix:header` is the hidden inline-XBRL block.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "ix:header"];

/// Flattens an HTML/XML filing to plain text.
///
/// Every visible text node is emitted in document order, one per line.
/// Whitespace-only nodes are dropped.
pub fn flatten_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| HIDDEN_ELEMENTS.contains(&el.value().name()));
        if hidden {
            continue;
        }
        parts.push(&**text);
    }

    let flattened = parts.join("\n");
    tracing::debug!(
        "Flattened {} bytes of HTML into {} bytes of text ({} text nodes)",
        html.len(),
        flattened.len(),
        parts.len()
    );
    flattened
}
