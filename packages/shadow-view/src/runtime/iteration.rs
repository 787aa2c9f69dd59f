//! Iteration regions at runtime
//!
//! Assigning a sequence to an iteration property throws away every child it
//! generated before and instantiates the region's view once per element.
//! Children are never diffed against the previous batch.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::instance::Instance;
use super::instantiator::Instantiator;
use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::template::ShadowView;
use crate::value::type_name;

#[derive(Debug)]
pub struct IterationState {
    anchor: NodeId,
    view: Arc<ShadowView>,
    children: Vec<Instance>,
}

impl IterationState {
    pub fn new(anchor: NodeId, view: Arc<ShadowView>) -> Self {
        IterationState {
            anchor,
            view,
            children: Vec::new(),
        }
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    pub fn view(&self) -> &Arc<ShadowView> {
        &self.view
    }

    pub fn children(&self) -> &[Instance] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Instance] {
        &mut self.children
    }

    /// Remove every generated child from the tree.
    pub fn clear(&mut self, dom: &Dom) {
        let mut doc = dom.borrow_mut();
        for child in self.children.drain(..) {
            doc.remove(child.root());
        }
    }

    /// Swap the generated children for one instance per item. The new batch
    /// is fully built before the old one is removed, so a failure leaves the
    /// previous children in place.
    pub fn replace(&mut self, dom: &Dom, instantiator: &Instantiator, items: &[Value]) -> Result<()> {
        let mut batch = Vec::with_capacity(items.len());
        for item in items {
            match instantiator.instantiate_into(dom, &self.view, None, Some(item)) {
                Ok(child) => batch.push(child),
                Err(err) => {
                    let mut doc = dom.borrow_mut();
                    for child in &batch {
                        doc.remove(child.root());
                    }
                    return Err(err);
                }
            }
        }

        let mut doc = dom.borrow_mut();
        for old in self.children.drain(..) {
            doc.remove(old.root());
        }
        for child in &batch {
            doc.append_child(self.anchor, child.root());
        }
        drop(doc);

        debug!(children = batch.len(), "regenerated iteration region");
        self.children = batch;
        Ok(())
    }
}

/// Items of a value assigned to the iteration property `property`. Anything
/// other than an array is logged and yields `None`; the assignment is then
/// ignored.
pub(crate) fn sequence_items<'v>(property: &str, value: &'v Value) -> Option<&'v [Value]> {
    match value {
        Value::Array(items) => Some(items),
        other => {
            let err = Error::InvalidSequence {
                property: property.to_string(),
                found: type_name(other),
            };
            warn!("{}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_items() {
        assert_eq!(sequence_items("items", &json!([1, 2])).map(|items| items.len()), Some(2));
        assert!(sequence_items("items", &json!({"a": 1})).is_none());
        assert!(sequence_items("items", &json!(null)).is_none());
    }
}
