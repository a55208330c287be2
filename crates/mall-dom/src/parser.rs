//! HTML5 loading
//!
//! Parses with html5ever's RcDom and converts into the arena tree.

use crate::{Document, DomTree, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, parse_fragment, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse a full document. html5ever recovers from every malformed
    /// input, so this never fails.
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        convert_node(&dom.document, &mut tree, root);

        tracing::debug!("Parsed {} nodes", tree.len());
        Document::from_tree(tree, url)
    }

    /// Parse `markup` as the content of `parent` (`innerHTML` assignment) and
    /// append the resulting nodes to it. Existing children are left alone.
    pub fn parse_fragment_into(&self, tree: &mut DomTree, parent: NodeId, markup: &str) {
        let context = tree
            .element(parent)
            .map_or_else(|| "body".to_string(), |e| e.tag.clone());
        let dom = parse_fragment(
            RcDom::default(),
            Default::default(),
            QualName::new(None, ns!(html), LocalName::from(context.as_str())),
            Vec::new(),
            true,
        )
        .one(markup);

        // The fragment lands under a synthetic <html> root
        let roots = dom.document.children.borrow();
        for root in roots.iter() {
            for child in root.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
    }
}

fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.trim().is_empty() {
                let id = tree.create_text(&text);
                tree.append_child(parent, id);
            }
        }
        RcNodeData::Comment { contents } => {
            let id = tree.create_comment(contents);
            tree.append_child(parent, id);
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            if let Some(element) = tree.element_mut(id) {
                for attr in attrs.borrow().iter() {
                    element.set_attr(&attr.name.local, &attr.value);
                }
            }
            tree.append_child(parent, id);

            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id);
            }
        }
        RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locates_body() {
        let doc = HtmlParser::new().parse("<html><body><p id=\"x\">Hello</p></body></html>");
        assert!(doc.body().is_some());
        let p = doc.get_element_by_id("x").unwrap();
        assert_eq!(doc.text_content(p), "Hello");
    }

    #[test]
    fn test_fragment_becomes_children() {
        let mut doc = HtmlParser::new().parse(r#"<div id="status"></div>"#);
        let status = doc.get_element_by_id("status").unwrap();
        HtmlParser::new().parse_fragment_into(
            doc.tree_mut(),
            status,
            r#"<span class="closed">Fermé</span> - Ouvre à 08h30"#,
        );

        let span = doc.select_one("#status span.closed").unwrap();
        assert_eq!(doc.tree().parent(span), Some(status));
        assert_eq!(doc.text_content(status), "Fermé - Ouvre à 08h30");
        assert!(doc.select_one("#status html").is_err());
    }

    #[test]
    fn test_fragment_gets_wrapped() {
        let doc = HtmlParser::new().parse("<div class=\"filter-btn active\">All</div>");
        let div = doc.select_one(".filter-btn").unwrap();
        assert!(doc.has_class(div, "active"));
        assert!(doc.body().is_some());
    }
}
