//! Arena-backed node tree

use std::cell::RefCell;
use std::rc::Rc;

use super::node::{is_form_control, Attribute, NodeData, NodeId, NodeKind};
use super::serializer;

/// Shared handle to a document that several instances append into.
pub type Dom = Rc<RefCell<Document>>;

pub fn new_dom() -> Dom {
    Rc::new(RefCell::new(Document::new()))
}

/// A forest of nodes stored in one arena. Nodes are created detached and
/// linked with [`append_child`](Document::append_child) /
/// [`insert_before`](Document::insert_before).
#[derive(Debug, Clone, Default)]
pub struct Document {
    slots: Vec<Option<NodeData>>,
    free: Vec<usize>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(data);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(data));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeData::element(name))
    }

    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::text(value))
    }

    pub fn create_comment(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::comment(value))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.node(id).map(|n| n.attrs.as_slice()).unwrap_or(&[])
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, appending it when the element does not carry it yet.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            match node.attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => node.attrs.push(Attribute::new(name, value)),
            }
        }
    }

    pub fn set_attribute_at(&mut self, id: NodeId, index: usize, value: &str) -> bool {
        match self.node_mut(id).and_then(|n| n.attrs.get_mut(index)) {
            Some(attr) => {
                attr.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_attribute_name_at(&mut self, id: NodeId, index: usize, name: &str) -> bool {
        match self.node_mut(id).and_then(|n| n.attrs.get_mut(index)) {
            Some(attr) => {
                attr.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node_mut(id)?;
        let index = node.attrs.iter().position(|a| a.name == name)?;
        Some(node.attrs.remove(index).value)
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.kind != NodeKind::Element)
            .map(|n| n.value.as_str())
    }

    pub fn set_text(&mut self, id: NodeId, value: &str) -> bool {
        match self.node_mut(id) {
            Some(node) if node.kind != NodeKind::Element => {
                node.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Live value of a form control. Falls back to the `value` attribute until
    /// the control has been written through.
    pub fn control_value(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id).filter(|n| is_form_control(&n.name))?;
        node.control_value
            .as_deref()
            .or_else(|| self.attribute(id, "value"))
    }

    pub fn set_control_value(&mut self, id: NodeId, value: &str) -> bool {
        match self.node_mut(id) {
            Some(node) if is_form_control(&node.name) => {
                node.control_value = Some(value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let position = reference
                .and_then(|r| node.children.iter().position(|c| *c == r))
                .unwrap_or(node.children.len());
            node.children.insert(position, child);
        }
    }

    /// Unlink a node from its parent. The subtree stays alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach a node and free its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.slots.get_mut(current.0).and_then(Option::take) {
                stack.extend(data.children);
                self.free.push(current.0);
            }
        }
    }

    /// Deep-copy the subtree rooted at `root` of `source` into this document.
    /// The copy is detached; node kinds, names, attributes, and child order are
    /// preserved.
    pub fn import(&mut self, source: &Document, root: NodeId) -> Option<NodeId> {
        source.node(root)?;
        let mut copy_root = None;
        // (node in `source`, parent of its copy in `self`)
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];
        while let Some((original, parent)) = stack.pop() {
            let Some(data) = source.node(original) else {
                continue;
            };
            let copy = self.alloc(NodeData {
                kind: data.kind,
                name: data.name.clone(),
                value: data.value.clone(),
                attrs: data.attrs.clone(),
                children: Vec::with_capacity(data.children.len()),
                parent,
                control_value: data.control_value.clone(),
            });
            match parent.and_then(|p| self.node_mut(p)) {
                Some(parent_data) => parent_data.children.push(copy),
                None => copy_root = Some(copy),
            }
            stack.extend(data.children.iter().rev().map(|child| (*child, Some(copy))));
        }
        copy_root
    }

    /// Deep-copy a subtree within this document.
    pub fn deep_clone(&mut self, root: NodeId) -> Option<NodeId> {
        let snapshot = self.clone();
        self.import(&snapshot, root)
    }

    /// Pre-order list of `root` and all its descendants.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of all text descendants.
    pub fn text_content(&self, root: NodeId) -> String {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.kind(*id) == Some(NodeKind::Text))
            .filter_map(|id| self.text(id))
            .collect()
    }

    pub fn to_html(&self, root: NodeId) -> String {
        serializer::serialize_node(self, root)
    }
}
