//! DOM Tree (arena-based allocation)

use crate::{ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree. Index 0 is always the document node.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(tag))))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(text.to_string())))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    /// Appending a node under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!("append_child: {:?} would become its own ancestor", child);
            return;
        }
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Remove `node` from its parent's child list
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.get(node).and_then(|n| n.parent) {
            self.nodes[parent.index()].children.retain(|&c| c != node);
            self.nodes[node.index()].parent = None;
        }
    }

    /// Drop every child of `node` (they stay allocated but unreachable)
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(children) = self.get_mut(node).map(|n| std::mem::take(&mut n.children)) else {
            return;
        };
        for child in children {
            self.nodes[child.index()].parent = None;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// `node` is `ancestor` or lies inside it (`Node.contains`)
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.get(node).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_descendants_order() {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let a = tree.create_element("section");
        let b = tree.create_element("section");
        let inner = tree.create_element("p");
        tree.append_child(tree.root(), body);
        tree.append_child(body, a);
        tree.append_child(a, inner);
        tree.append_child(body, b);

        assert_eq!(tree.descendants(tree.root()), vec![body, a, inner, b]);
        assert_eq!(tree.parent(inner), Some(a));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let mut tree = DomTree::new();
        let menu = tree.create_element("ul");
        let link = tree.create_element("a");
        let other = tree.create_element("div");
        tree.append_child(tree.root(), menu);
        tree.append_child(menu, link);
        tree.append_child(tree.root(), other);

        assert!(tree.contains(menu, menu));
        assert!(tree.contains(menu, link));
        assert!(!tree.contains(menu, other));
    }

    #[test]
    fn test_reparent_detaches() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let child = tree.create_element("span");
        tree.append_child(a, child);
        tree.append_child(b, child);

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[child]);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut tree = DomTree::new();
        let el = tree.create_element("div");
        let span = tree.create_element("span");
        let open = tree.create_text("Open");
        let now = tree.create_text(" now");
        tree.append_child(el, span);
        tree.append_child(span, open);
        tree.append_child(el, now);
        assert_eq!(tree.text_content(el), "Open now");

        tree.clear_children(el);
        assert_eq!(tree.text_content(el), "");
    }

    #[test]
    fn test_append_under_own_descendant_is_ignored() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(tree.root(), outer);
        tree.append_child(outer, inner);

        tree.append_child(inner, outer);
        tree.append_child(outer, outer);

        assert_eq!(tree.parent(outer), Some(tree.root()));
        assert_eq!(tree.children(inner), &[] as &[NodeId]);
        assert_eq!(tree.descendants(tree.root()), vec![outer, inner]);
    }
}
