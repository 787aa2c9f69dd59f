//! Node tree shared by compiled skeletons and live instances

pub mod document;
pub mod node;
pub mod serializer;

pub use document::{new_dom, Document, Dom};
pub use node::{is_form_control, Attribute, NodeData, NodeId, NodeKind, NodeRef};
