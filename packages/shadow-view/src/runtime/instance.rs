//! Live instances
//!
//! An instance owns a cloned subtree, one backing value per property and the
//! accessor table installed by the instantiator. Properties are defined at
//! runtime from a compiled view, so accessors live in a name keyed map and
//! are reached through [`Instance::get`] and [`Instance::set`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::component::Component;
use super::instantiator::Instantiator;
use super::iteration::{sequence_items, IterationState};
use crate::dom::{is_form_control, Document, Dom, NodeId, NodeRef};
use crate::error::Result;
use crate::template::expression::ReconstructionExpression;
use crate::template::scanner::SELF_REFERENCE;
use crate::value::resolve_path;

/// A bound location decoded against one instance's subtree.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub target: NodeRef,
    pub expression: Arc<ReconstructionExpression>,
}

impl ResolvedLocation {
    fn write(&self, doc: &mut Document, bound: &str, values: &IndexMap<String, Value>) {
        let text = self.expression.evaluate(bound, values);
        match self.target {
            NodeRef::Node(id) => {
                doc.set_text(id, &text);
            }
            NodeRef::Attribute { owner, index } => {
                let live_value = doc.name(owner).is_some_and(is_form_control)
                    && doc
                        .attributes(owner)
                        .get(index)
                        .is_some_and(|attr| attr.name.eq_ignore_ascii_case("value"));
                if live_value {
                    doc.set_control_value(owner, &text);
                } else {
                    doc.set_attribute_at(owner, index, &text);
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum PropertyAccessor {
    /// Writes straight into resolved text and attribute locations.
    Bound(Vec<ResolvedLocation>),
    /// Regenerates child instances under an anchor.
    Iterating(IterationState),
}

pub struct Instance {
    dom: Dom,
    root: NodeId,
    class_name: String,
    component: Box<dyn Component>,
    values: IndexMap<String, Value>,
    properties: IndexMap<String, PropertyAccessor>,
    instantiator: Instantiator,
}

impl Instance {
    /// Wrap an existing subtree. No accessors are installed yet.
    pub fn new(
        dom: Dom,
        root: NodeId,
        class_name: impl Into<String>,
        component: Box<dyn Component>,
        instantiator: Instantiator,
    ) -> Self {
        Instance {
            dom,
            root,
            class_name: class_name.into(),
            component,
            values: IndexMap::new(),
            properties: IndexMap::new(),
            instantiator,
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn instantiator(&self) -> &Instantiator {
        &self.instantiator
    }

    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    pub fn component_mut(&mut self) -> &mut dyn Component {
        self.component.as_mut()
    }

    pub fn downcast<T: Component>(&self) -> Option<&T> {
        self.component.as_any().downcast_ref::<T>()
    }

    /// Install an accessor under `name`. Locations defined twice for a bound
    /// property accumulate; any other redefinition replaces the accessor.
    /// A replaced iteration accessor takes its generated children out of the
    /// tree with it, so only the newest anchor is ever populated.
    pub fn define_property(&mut self, name: impl Into<String>, accessor: PropertyAccessor) {
        let name = name.into();
        match accessor {
            PropertyAccessor::Bound(more) => match self.properties.get_mut(&name) {
                Some(PropertyAccessor::Bound(existing)) => existing.extend(more),
                _ => self.replace_accessor(name, PropertyAccessor::Bound(more)),
            },
            other => self.replace_accessor(name, other),
        }
    }

    fn replace_accessor(&mut self, name: String, accessor: PropertyAccessor) {
        if let Some(PropertyAccessor::Iterating(mut previous)) =
            self.properties.insert(name.clone(), accessor)
        {
            warn!(property = %name, "iteration region redefined; previous children removed");
            previous.clear(&self.dom);
        }
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn accessor(&self, name: &str) -> Option<&PropertyAccessor> {
        self.properties.get(name)
    }

    /// Current backing value of a property.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Assign a property. Dotted properties below `name` (`user.name` for
    /// `user`) are refreshed from the new value as well.
    ///
    /// Assigning a non-sequence to an iteration property is logged and
    /// otherwise ignored: children, backing value and notifications stay as
    /// they were. An error is only returned when a child cannot be built.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let dependents: Vec<(String, Value)> = self
            .properties
            .keys()
            .filter_map(|key| {
                let rest = key.strip_prefix(name)?.strip_prefix('.')?;
                let resolved = resolve_path(&value, rest).cloned().unwrap_or(Value::Null);
                Some((key.clone(), resolved))
            })
            .collect();

        self.assign(name, value)?;
        for (key, resolved) in dependents {
            self.assign(&key, resolved)?;
        }
        Ok(())
    }

    /// Bulk assignment: every property whose name resolves in `data` takes
    /// that value, `@` takes `data` itself. The component's `configure` hook
    /// runs last. A `null` payload only reaches the hook.
    pub fn configure(&mut self, data: &Value) {
        if !data.is_null() {
            let names: Vec<String> = self.properties.keys().cloned().collect();
            for name in names {
                let Some(value) = resolve_path(data, &name) else {
                    continue;
                };
                if let Err(err) = self.assign(&name, value.clone()) {
                    debug!(property = %name, "skipped during configure: {}", err);
                }
            }
        }
        self.component.configure(data);
    }

    /// Child instances currently generated for an iteration property.
    pub fn children(&self, name: &str) -> &[Instance] {
        match self.properties.get(name) {
            Some(PropertyAccessor::Iterating(state)) => state.children(),
            _ => &[],
        }
    }

    pub fn children_mut(&mut self, name: &str) -> &mut [Instance] {
        match self.properties.get_mut(name) {
            Some(PropertyAccessor::Iterating(state)) => state.children_mut(),
            _ => &mut [],
        }
    }

    /// Markup of this instance's subtree.
    pub fn render(&self) -> String {
        self.dom.borrow().to_html(self.root)
    }

    pub fn text_content(&self) -> String {
        self.dom.borrow().text_content(self.root)
    }

    pub(crate) fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.properties.get(name) {
            Some(PropertyAccessor::Iterating(_)) => self.assign_sequence(name, value),
            Some(PropertyAccessor::Bound(_)) => {
                self.assign_bound(name, value);
                Ok(())
            }
            None => {
                self.values.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    fn assign_bound(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
        if let Some(PropertyAccessor::Bound(locations)) = self.properties.get(name) {
            let mut doc = self.dom.borrow_mut();
            for location in locations {
                location.write(&mut doc, name, &self.values);
            }
        }
        self.notify(name);
    }

    fn assign_sequence(&mut self, name: &str, value: Value) -> Result<()> {
        let Some(items) = sequence_items(name, &value) else {
            return Ok(());
        };
        if let Some(PropertyAccessor::Iterating(state)) = self.properties.get_mut(name) {
            state.replace(&self.dom, &self.instantiator, items)?;
        }
        self.values.insert(name.to_string(), value);
        self.notify(name);
        Ok(())
    }

    fn notify(&mut self, name: &str) {
        let scope = (name != SELF_REFERENCE).then_some(name);
        self.component.property_change(scope);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class_name", &self.class_name)
            .field("root", &self.root)
            .field("values", &self.values)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish()
    }
}
