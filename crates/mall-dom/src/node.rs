//! DOM Node
//!
//! Nodes live in the [`DomTree`](crate::DomTree) arena and link to each other
//! by [`NodeId`]. `class` and `style` are kept parsed rather than as raw
//! attribute strings since page scripts touch them far more than anything else.

use crate::{DOMTokenList, ElementGeometry, MediaState, NodeId};

/// DOM Node
#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes other than `class` and `style`, in source order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute
    pub id: Option<String>,
    pub classes: DOMTokenList,
    /// Inline style declarations, in insertion order
    pub style: Vec<(String, String)>,
    pub geometry: ElementGeometry,
    /// Present on `<video>` and `<audio>`
    pub media: Option<MediaState>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let media = matches!(tag.as_str(), "video" | "audio").then(MediaState::new);
        Self {
            tag,
            attrs: Vec::new(),
            id: None,
            classes: DOMTokenList::new(),
            style: Vec::new(),
            geometry: ElementGeometry::default(),
            media,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<String> {
        match name {
            "class" => (!self.classes.is_empty()).then(|| self.classes.value()),
            "style" => (!self.style.is_empty()).then(|| self.style_text()),
            _ => self
                .attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        match name {
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attrs.iter().any(|a| a.name == name),
        }
    }

    /// Set an attribute, keeping the id/class/style caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => {
                self.classes = DOMTokenList::from_string(value);
                return;
            }
            "style" => {
                self.style = parse_style(value);
                return;
            }
            "id" => self.id = Some(value.to_string()),
            _ => {}
        }

        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attrs.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Set one inline style property (`element.style.prop = value`)
    pub fn set_style(&mut self, property: &str, value: &str) {
        if let Some(decl) = self.style.iter_mut().find(|(p, _)| p == property) {
            decl.1 = value.to_string();
        } else {
            self.style.push((property.to_string(), value.to_string()));
        }
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            (!prop.is_empty()).then(|| (prop.to_string(), value.trim().to_string()))
        })
        .collect()
}
