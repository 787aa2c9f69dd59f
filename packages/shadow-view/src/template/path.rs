//! Structural paths
//!
//! A [`StructuralPath`] records where a node sits below a root as a list of
//! `(kind, name, ordinal)` steps, where the ordinal counts preceding siblings
//! with the same kind and name. Attribute locations end with a single
//! attribute step. Because a deep copy preserves kinds, names, and sibling
//! order, a path encoded against one tree decodes to the equivalent node in
//! any unmodified copy of it.
//!
//! Paths are not stable across edits: inserting or removing a same-named
//! sibling before a recorded node shifts its ordinal.

use std::fmt;

use smallvec::SmallVec;

use crate::dom::{Document, NodeId, NodeKind, NodeRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathFrame {
    Child {
        kind: NodeKind,
        name: String,
        ordinal: usize,
    },
    /// Terminal step selecting an attribute of the current element.
    Attribute(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructuralPath {
    frames: SmallVec<[PathFrame; 6]>,
}

impl StructuralPath {
    pub fn frames(&self) -> &[PathFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// The empty path addresses the root itself.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.frames.last(), Some(PathFrame::Attribute(_)))
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return write!(f, "/");
        }
        for frame in &self.frames {
            match frame {
                PathFrame::Child { name, ordinal, .. } => write!(f, "/{}[{}]", name, ordinal)?,
                PathFrame::Attribute(name) => write!(f, "/@{}", name)?,
            }
        }
        Ok(())
    }
}

/// Encode the position of `target` below `root`. Returns `None` when the
/// target is not inside `root` or no longer exists.
pub fn encode(doc: &Document, root: NodeId, target: NodeRef) -> Option<StructuralPath> {
    let mut frames: SmallVec<[PathFrame; 6]> = SmallVec::new();

    let mut current = match target {
        NodeRef::Node(id) => id,
        NodeRef::Attribute { owner, index } => {
            let attr = doc.attributes(owner).get(index)?;
            frames.push(PathFrame::Attribute(attr.name.clone()));
            owner
        }
    };

    while current != root {
        let node = doc.node(current)?;
        let parent = node.parent?;
        let ordinal = doc
            .children(parent)
            .iter()
            .take_while(|sibling| **sibling != current)
            .filter(|sibling| {
                doc.node(**sibling)
                    .is_some_and(|s| s.kind == node.kind && s.name == node.name)
            })
            .count();
        frames.push(PathFrame::Child {
            kind: node.kind,
            name: node.name.clone(),
            ordinal,
        });
        current = parent;
    }

    if !doc.contains(root) {
        return None;
    }
    frames.reverse();
    Some(StructuralPath { frames })
}

/// Replay `path` from `root`. Returns `None` if any step has no match.
pub fn decode(doc: &Document, root: NodeId, path: &StructuralPath) -> Option<NodeRef> {
    if !doc.contains(root) {
        return None;
    }
    let mut current = root;
    let last = path.frames.len().saturating_sub(1);

    for (position, frame) in path.frames.iter().enumerate() {
        match frame {
            PathFrame::Attribute(name) => {
                if position != last {
                    return None;
                }
                let index = doc.attributes(current).iter().position(|a| &a.name == name)?;
                return Some(NodeRef::Attribute {
                    owner: current,
                    index,
                });
            }
            PathFrame::Child {
                kind,
                name,
                ordinal,
            } => {
                current = doc
                    .children(current)
                    .iter()
                    .copied()
                    .filter(|child| {
                        doc.node(*child)
                            .is_some_and(|c| c.kind == *kind && &c.name == name)
                    })
                    .nth(*ordinal)?;
            }
        }
    }

    Some(NodeRef::Node(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_encodes_to_empty_path() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let path = encode(&doc, root, NodeRef::Node(root)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "/");
        assert_eq!(decode(&doc, root, &path), Some(NodeRef::Node(root)));
    }

    #[test]
    fn test_ordinal_counts_same_name_only() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let span = doc.create_element("span");
        let b1 = doc.create_element("b");
        let b2 = doc.create_element("b");
        for child in [b1, span, b2] {
            doc.append_child(root, child);
        }
        let path = encode(&doc, root, NodeRef::Node(b2)).unwrap();
        assert_eq!(path.to_string(), "/b[1]");
    }

    #[test]
    fn test_node_outside_root() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let stray = doc.create_element("p");
        assert_eq!(encode(&doc, root, NodeRef::Node(stray)), None);
    }

    #[test]
    fn test_attribute_path_display() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("a");
        doc.append_child(root, a);
        doc.set_attribute(a, "id", "x");
        doc.set_attribute(a, "href", "y");
        let path = encode(&doc, root, NodeRef::Attribute { owner: a, index: 1 }).unwrap();
        assert!(path.is_attribute());
        assert_eq!(path.to_string(), "/a[0]/@href");
    }
}
