//! Storefront DOM
//!
//! Arena-backed document model used by the headless page runtime.
//! Nodes are addressed by [`NodeId`] and never freed while the document lives.

mod classlist;
mod document;
mod geometry;
mod media;
mod node;
mod parser;
mod selector;
mod serializer;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use geometry::{DOMRect, ElementGeometry};
pub use media::{MediaState, NetworkState, ReadyState};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use parser::HtmlParser;
pub use selector::SelectorList;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),

    #[error("no element matches selector: {0}")]
    SelectorNotFound(String),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("html parse error: {0}")]
    HtmlParse(String),
}

pub type Result<T> = std::result::Result<T, DomError>;
