//! Loading HTML fragments into a [`Document`].
//!
//! Parsing is done by `scraper` (html5ever underneath), so entities, raw-text
//! elements and unbalanced markup follow browser rules. The parsed tree is
//! then copied element by element into the arena.

use scraper::{ElementRef, Html};

use crate::core::NodeId;
use crate::core::error::IoError;
use crate::ui::dom::Document;

/// Parse `html` and append the resulting elements under `parent`.
/// Returns the top-level elements created.
pub fn parse_fragment(
    doc: &mut Document,
    parent: NodeId,
    html: &str,
) -> Result<Vec<NodeId>, IoError> {
    doc.require(parent, "fragment parent")?;
    let fragment = Html::parse_fragment(html);
    if !fragment.errors.is_empty() {
        tracing::debug!(errors = ?fragment.errors, "fragment parsed with recoverable errors");
    }
    copy_children(doc, parent, fragment.root_element())
}

fn copy_children(
    doc: &mut Document,
    parent: NodeId,
    source: ElementRef<'_>,
) -> Result<Vec<NodeId>, IoError> {
    let mut created = Vec::new();
    for child in source.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
            let node = doc.create_element(parent, element.value().name(), &attrs)?;
            copy_children(doc, node, element)?;
            created.push(node);
        } else if let Some(text) = child.value().as_text()
            && !text.trim().is_empty()
        {
            append_text(doc, parent, text);
        }
    }
    Ok(created)
}

fn append_text(doc: &mut Document, node: NodeId, text: &str) {
    let mut combined = doc.text(node).to_string();
    combined.push_str(text);
    if doc.tag(node) == "textarea" {
        doc.set_value(node, combined.clone());
    }
    doc.set_text(node, combined);
}

#[cfg(test)]
mod tests {
    use super::parse_fragment;
    use crate::ui::dom::Document;

    #[test]
    fn builds_nested_elements_with_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = parse_fragment(
            &mut doc,
            root,
            r#"<div class="record" data-id=3><span data-io='checkbox' data-required></span><input value="a &amp; b"/></div>"#,
        )
        .expect("well-formed fragment");

        assert_eq!(nodes.len(), 1);
        let record = nodes[0];
        assert!(doc.has_class(record, "record"));
        assert_eq!(doc.attr(record, "data-id"), Some("3"));

        let children = doc.children(record).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.attr(children[0], "data-io"), Some("checkbox"));
        assert_eq!(doc.attr(children[0], "data-required"), Some(""));
        assert_eq!(doc.value(children[1]), "a & b");
    }

    #[test]
    fn skips_comments_and_keeps_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = parse_fragment(&mut doc, root, "<!-- note --><p>hello <b>you</b></p>")
            .expect("fragment");
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.text(nodes[0]), "hello ");
        assert_eq!(doc.text(doc.children(nodes[0])[0]), "you");
    }

    #[test]
    fn textarea_text_becomes_its_value() {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = parse_fragment(&mut doc, root, "<textarea>caf&eacute; &#65;&lt;b&gt;</textarea>")
            .expect("fragment");
        assert_eq!(doc.value(nodes[0]), "café A<b>");
    }

    #[test]
    fn unbalanced_markup_is_recovered() {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = parse_fragment(&mut doc, root, "<DIV data-io=text><p>open").expect("fragment");
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.tag(nodes[0]), "div");
        assert_eq!(doc.attr(nodes[0], "data-io"), Some("text"));
        let paragraph = doc.children(nodes[0])[0];
        assert_eq!(doc.text(paragraph), "open");
    }

    #[test]
    fn missing_parent_is_reported() {
        let mut doc = Document::new();
        let root = doc.root();
        let gone = doc.create_element(root, "div", &[]).expect("div");
        doc.remove(gone);
        assert!(parse_fragment(&mut doc, gone, "<p></p>").is_err());
    }
}
