//! Node handles and node payloads

use serde::Serialize;

/// Handle to a node slot inside one [`Document`](super::Document).
///
/// A `NodeId` is only meaningful for the document that issued it. Slots are
/// recycled after [`Document::remove`](super::Document::remove), so a handle to a
/// removed node must not be kept around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

pub const TEXT_NODE_NAME: &str = "#text";
pub const COMMENT_NODE_NAME: &str = "#comment";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Tag name for elements, `#text` / `#comment` otherwise.
    pub name: String,
    /// Character data for text and comment nodes.
    pub value: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Live value of a form control, independent of its `value` attribute.
    pub control_value: Option<String>,
}

impl NodeData {
    pub fn element(name: &str) -> Self {
        NodeData {
            kind: NodeKind::Element,
            name: name.to_string(),
            value: String::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
            control_value: None,
        }
    }

    pub fn text(value: &str) -> Self {
        NodeData {
            kind: NodeKind::Text,
            name: TEXT_NODE_NAME.to_string(),
            value: value.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
            control_value: None,
        }
    }

    pub fn comment(value: &str) -> Self {
        NodeData {
            kind: NodeKind::Comment,
            name: COMMENT_NODE_NAME.to_string(),
            ..NodeData::text(value)
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }
}

/// A bindable location: either a whole node or one attribute of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Node(NodeId),
    Attribute { owner: NodeId, index: usize },
}

impl NodeRef {
    /// The node that owns this location.
    pub fn node(&self) -> NodeId {
        match *self {
            NodeRef::Node(id) => id,
            NodeRef::Attribute { owner, .. } => owner,
        }
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        NodeRef::Node(id)
    }
}

/// Elements whose `value` attribute is mirrored by a live control value.
pub fn is_form_control(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "input" | "textarea" | "select")
}
