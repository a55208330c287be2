//! Document - High-level document API

use crate::serializer::serialize_inner;
use crate::{
    DomError, DomTree, ElementGeometry, HtmlParser, MediaState, NodeId, Result, SelectorList,
};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: Option<NodeId>,
    body_element: Option<NodeId>,
}

impl Document {
    /// Create a document with an empty `<html><head/><body/></html>` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: Some(html),
            body_element: Some(body),
        }
    }

    /// Wrap an already built tree, locating `<html>` and `<body>`
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        let mut document = Self {
            tree,
            url: url.to_string(),
            html_element: None,
            body_element: None,
        };
        document.finalize();
        document
    }

    fn finalize(&mut self) {
        let find = |tag: &str| {
            self.tree
                .descendants(self.tree.root())
                .into_iter()
                .find(|&id| self.tree.element(id).is_some_and(|e| e.tag == tag))
        };
        self.html_element = find("html");
        self.body_element = find("body");
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body_element
    }

    /// First element in document order carrying `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).is_some_and(|e| e.id.as_deref() == Some(id)))
    }

    /// All matching elements in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_within_all(self.tree.root(), selector)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Matching descendants of `scope` in document order
    pub fn query_within_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .filter(|&n| list.matches(&self.tree, n))
            .collect())
    }

    pub fn query_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_within_all(scope, selector)?.into_iter().next())
    }

    /// First match, or `SelectorNotFound`
    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.query_selector(selector)?
            .ok_or_else(|| DomError::SelectorNotFound(selector.into()))
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.classes.contains(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.classes.add(class);
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.classes.remove(class);
        Ok(())
    }

    /// Toggle a class, returning the new membership state
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> Result<bool> {
        Ok(self.element_mut(node)?.classes.toggle(class, None))
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.element(node)?.style(property).map(str::to_string)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        self.element_mut(node)?.set_style(property, value);
        Ok(())
    }

    /// Serialized children; `None` for non-elements
    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        self.tree.element(node)?;
        Some(serialize_inner(&self.tree, node))
    }

    /// Replace the element's children with the parsed `markup`
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()> {
        self.element_mut(node)?;
        self.tree.clear_children(node);
        HtmlParser::new().parse_fragment_into(&mut self.tree, node, markup);
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn geometry(&self, node: NodeId) -> ElementGeometry {
        self.tree.element(node).map(|e| e.geometry).unwrap_or_default()
    }

    pub fn set_geometry(&mut self, node: NodeId, geometry: ElementGeometry) -> Result<()> {
        self.element_mut(node)?.geometry = geometry;
        Ok(())
    }

    pub fn media(&self, node: NodeId) -> Option<&MediaState> {
        self.tree.element(node)?.media.as_ref()
    }

    pub fn media_mut(&mut self, node: NodeId) -> Option<&mut MediaState> {
        self.tree.element_mut(node)?.media.as_mut()
    }

    /// Lowest document offset reached by any laid-out element
    pub fn content_height(&self) -> f64 {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter_map(|n| self.tree.element(n))
            .map(|e| e.geometry.document_rect().bottom())
            .fold(0.0, f64::max)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut crate::ElementData> {
        self.tree.element_mut(node).ok_or(DomError::NotAnElement(node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        assert!(doc.body().is_some());
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_query_in_document_order() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let tree = doc.tree_mut();
        let first = tree.create_element("div");
        let second = tree.create_element("div");
        tree.append_child(body, first);
        tree.append_child(body, second);
        doc.set_attr(first, "class", "product-card").unwrap();
        doc.set_attr(second, "class", "product-card").unwrap();
        doc.set_attr(second, "id", "last").unwrap();

        assert_eq!(doc.query_selector_all(".product-card").unwrap(), vec![first, second]);
        assert_eq!(doc.get_element_by_id("last"), Some(second));
        assert!(matches!(
            doc.select_one(".missing"),
            Err(DomError::SelectorNotFound(_))
        ));
    }

    #[test]
    fn test_inner_html_replaces_children_with_nodes() {
        let mut doc = crate::HtmlParser::new()
            .parse(r#"<button id="play"><i class="fas fa-play"></i></button>"#);
        let button = doc.get_element_by_id("play").unwrap();

        doc.set_inner_html(button, r#"<i class="fas fa-pause"></i>"#).unwrap();

        assert!(doc.query_selector("#play i.fa-play").unwrap().is_none());
        let icon = doc.select_one("#play i.fa-pause").unwrap();
        assert_eq!(doc.tree().parent(icon), Some(button));
        assert_eq!(
            doc.inner_html(button).as_deref(),
            Some(r#"<i class="fas fa-pause"></i>"#)
        );
        assert_eq!(doc.inner_html(NodeId::ROOT), None);
    }

    #[test]
    fn test_class_ops_on_non_element_fail() {
        let mut doc = Document::default();
        assert_eq!(
            doc.add_class(NodeId::ROOT, "x"),
            Err(DomError::NotAnElement(NodeId::ROOT))
        );
    }
}
