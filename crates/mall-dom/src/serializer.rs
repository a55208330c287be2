//! HTML serialization (`innerHTML`)
//!
//! Attributes come out as `class`, then the remaining attributes in source
//! order, then `style`.

use crate::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (content is not escaped)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Markup of the children of `node`
pub fn serialize_inner(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    for &child in tree.children(node) {
        serialize_node(tree, child, &mut output);
    }
    output
}

fn serialize_node(tree: &DomTree, node: NodeId, output: &mut String) {
    let Some(data) = tree.get(node).map(|n| &n.data) else {
        return;
    };
    match data {
        NodeData::Document => {
            for &child in tree.children(node) {
                serialize_node(tree, child, output);
            }
        }
        NodeData::Element(elem) => {
            output.push('<');
            output.push_str(&elem.tag);
            if let Some(class) = elem.get_attr("class") {
                push_attribute(output, "class", &class);
            }
            for attr in &elem.attrs {
                push_attribute(output, &attr.name, &attr.value);
            }
            if let Some(style) = elem.get_attr("style") {
                push_attribute(output, "style", &style);
            }
            output.push('>');

            if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&elem.tag.as_str());
            for &child in tree.children(node) {
                match tree.get(child).and_then(|c| c.as_text()) {
                    Some(text) if raw => output.push_str(text),
                    _ => serialize_node(tree, child, output),
                }
            }
            output.push_str("</");
            output.push_str(&elem.tag);
            output.push('>');
        }
        NodeData::Text(text) => escape_text(text, output),
        NodeData::Comment(text) => {
            output.push_str("<!--");
            output.push_str(text);
            output.push_str("-->");
        }
    }
}

fn push_attribute(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    escape_attribute(value, output);
    output.push('"');
}

fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inner_markup() {
        let doc = HtmlParser::new().parse(
            r#"<p id="x"><i class="fas fa-play"></i> Lire &amp; <img src="a.jpg" alt="A"></p>"#,
        );
        let p = doc.get_element_by_id("x").unwrap();
        assert_eq!(
            serialize_inner(doc.tree(), p),
            r#"<i class="fas fa-play"></i> Lire &amp; <img src="a.jpg" alt="A">"#
        );
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let mut doc = HtmlParser::new().parse(r#"<div id="x"></div>"#);
        let x = doc.get_element_by_id("x").unwrap();
        let tree = doc.tree_mut();
        let span = tree.create_element("span");
        tree.append_child(x, span);
        doc.set_attr(span, "title", r#"say "hi""#).unwrap();
        assert_eq!(
            serialize_inner(doc.tree(), x),
            r#"<span title="say &quot;hi&quot;"></span>"#
        );
    }
}
