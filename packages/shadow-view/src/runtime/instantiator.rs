//! Instantiator
//!
//! Clones a Shadow View's skeleton, decodes every recorded path against the
//! clone and installs one accessor per property on the new instance.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::component::ComponentRegistry;
use super::instance::{Instance, PropertyAccessor, ResolvedLocation};
use super::iteration::IterationState;
use crate::dom::{new_dom, Dom, NodeId, NodeRef};
use crate::error::{Error, Result};
use crate::template::path::decode;
use crate::template::{ShadowView, ViewBinding};

#[derive(Debug, Clone, Default)]
pub struct Instantiator {
    registry: Arc<ComponentRegistry>,
}

impl Instantiator {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Instantiator { registry }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Instantiate `view` into a fresh document.
    pub fn instantiate(
        &self,
        view: &Arc<ShadowView>,
        class_name: Option<&str>,
        data: Option<&Value>,
    ) -> Result<Instance> {
        self.instantiate_into(&new_dom(), view, class_name, data)
    }

    /// Instantiate `view` into `dom`. The instance root is left detached.
    ///
    /// The component is built first, then accessors are installed, then
    /// `initialize` runs, then `data` (or `null`) is applied through
    /// [`Instance::configure`].
    pub fn instantiate_into(
        &self,
        dom: &Dom,
        view: &Arc<ShadowView>,
        class_name: Option<&str>,
        data: Option<&Value>,
    ) -> Result<Instance> {
        let class_name = class_name.unwrap_or(view.target_class());
        let component = self.registry.create(class_name)?;

        let root = dom
            .borrow_mut()
            .import(view.skeleton(), view.root())
            .ok_or_else(|| Error::BindingResolution {
                property: class_name.to_string(),
                path: "/".to_string(),
            })?;

        let mut instance = Instance::new(dom.clone(), root, class_name, component, self.clone());
        self.bind(view, &mut instance, root);
        instance.component_mut().initialize();
        instance.configure(data.unwrap_or(&Value::Null));
        Ok(instance)
    }

    /// Install the bindings of `view` on `instance`, resolving paths below
    /// `root`. Locations that do not resolve are logged and skipped. Returns
    /// the number of locations that did resolve.
    pub fn bind(&self, view: &ShadowView, instance: &mut Instance, root: NodeId) -> usize {
        let dom = instance.dom().clone();
        let mut resolved = 0;

        for binding in view.bindings() {
            let accessor = {
                let doc = dom.borrow();
                match binding {
                    ViewBinding::Leaf { name, locations } => {
                        let targets: Vec<ResolvedLocation> = locations
                            .iter()
                            .filter_map(|record| match decode(&doc, root, &record.path) {
                                Some(target) => Some(ResolvedLocation {
                                    target,
                                    expression: record.expression.clone(),
                                }),
                                None => {
                                    let err = Error::BindingResolution {
                                        property: name.to_string(),
                                        path: record.path.to_string(),
                                    };
                                    warn!("{}", err);
                                    None
                                }
                            })
                            .collect();
                        resolved += targets.len();
                        PropertyAccessor::Bound(targets)
                    }
                    ViewBinding::Iterating { name, region } => {
                        match decode(&doc, root, &region.anchor) {
                            Some(NodeRef::Node(anchor)) => {
                                resolved += 1;
                                PropertyAccessor::Iterating(IterationState::new(
                                    anchor,
                                    region.view.clone(),
                                ))
                            }
                            _ => {
                                let err = Error::BindingResolution {
                                    property: name.to_string(),
                                    path: region.anchor.to_string(),
                                };
                                warn!("{}", err);
                                continue;
                            }
                        }
                    }
                }
            };
            instance.define_property(binding.name(), accessor);
        }

        debug!(
            class = %instance.class_name(),
            resolved,
            "installed shadow view bindings"
        );
        resolved
    }
}
