//! Component collaborator
//!
//! Instances are backed by a component object constructed from a class name.
//! The engine only drives its lifecycle hooks; what a component does with
//! them is up to the host.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::DEFAULT_COMPONENT_CLASS;
use crate::error::{Error, Result};

pub trait Component: Any {
    /// Called once, after all accessors are installed and before any data
    /// is applied.
    fn initialize(&mut self) {}

    /// Called once per bulk assignment, after the bound properties took the
    /// new values.
    fn configure(&mut self, _data: &Value) {}

    /// Raised after every successful bound property mutation. `None` stands
    /// for the self-reference property.
    fn property_change(&mut self, _name: Option<&str>) {}

    fn as_any(&self) -> &dyn Any;
}

/// Default target class.
#[derive(Debug, Default)]
pub struct GenericComponent {
    initialized: bool,
    configure_calls: usize,
    change_count: usize,
    last_change: Option<Option<String>>,
}

impl GenericComponent {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls
    }

    pub fn change_count(&self) -> usize {
        self.change_count
    }

    /// The most recent notification, if any was raised.
    pub fn last_change(&self) -> Option<Option<&str>> {
        self.last_change.as_ref().map(|name| name.as_deref())
    }
}

impl Component for GenericComponent {
    fn initialize(&mut self) {
        self.initialized = true;
    }

    fn configure(&mut self, _data: &Value) {
        self.configure_calls += 1;
    }

    fn property_change(&mut self, name: Option<&str>) {
        self.change_count += 1;
        self.last_change = Some(name.map(str::to_string));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type ComponentFactory = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// Class name to component factory.
#[derive(Clone)]
pub struct ComponentRegistry {
    factories: IndexMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// A registry without any class, not even the generic one.
    pub fn empty() -> Self {
        ComponentRegistry {
            factories: IndexMap::new(),
        }
    }

    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        self.factories.insert(class_name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn create(&self, class_name: &str) -> Result<Box<dyn Component>> {
        self.factories
            .get(class_name)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownComponentClass(class_name.to_string()))
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut registry = ComponentRegistry::empty();
        registry.register(DEFAULT_COMPONENT_CLASS, || {
            Box::new(GenericComponent::default()) as Box<dyn Component>
        });
        registry
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_builds_generic_component() {
        let registry = ComponentRegistry::default();
        let component = registry.create(DEFAULT_COMPONENT_CLASS).unwrap();
        assert!(component.as_any().downcast_ref::<GenericComponent>().is_some());
    }

    #[test]
    fn test_unknown_class() {
        let registry = ComponentRegistry::empty();
        assert!(matches!(
            registry.create("Missing"),
            Err(Error::UnknownComponentClass(name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_generic_component_records_changes() {
        let mut component = GenericComponent::default();
        assert_eq!(component.last_change(), None);
        component.property_change(Some("title"));
        component.property_change(None);
        assert_eq!(component.change_count(), 2);
        assert_eq!(component.last_change(), Some(None));
    }
}
