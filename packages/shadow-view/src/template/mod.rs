//! Templates
//!
//! A [`Template`] wraps placeholder-marked markup. Its Shadow View is compiled
//! on first use and cached for the template's lifetime; every instance is a
//! clone of that one skeleton.

pub mod compiler;
pub mod expression;
pub mod interpolate;
pub mod path;
pub mod scanner;
pub mod shadow_view;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

pub use compiler::ShadowViewCompiler;
pub use expression::{Fragment, ReconstructionExpression};
pub use path::{decode, encode, PathFrame, StructuralPath};
pub use scanner::{scan, ScanResult};
pub use shadow_view::{
    BindingRecord, IterationRegion, PropertySummary, RegionSummary, ShadowView, ViewBinding,
    ViewSummary,
};

use crate::config::TemplateConfig;
use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::runtime::{ComponentRegistry, Instance, Instantiator};

pub struct Template {
    text: String,
    config: TemplateConfig,
    instantiator: Instantiator,
    compiled: OnceCell<Result<Arc<ShadowView>>>,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Template::with_config(text, TemplateConfig::default())
    }

    pub fn with_config(text: impl Into<String>, config: TemplateConfig) -> Self {
        Template {
            text: text.into(),
            config,
            instantiator: Instantiator::default(),
            compiled: OnceCell::new(),
        }
    }

    /// Use `registry` to construct target classes.
    pub fn with_registry(mut self, registry: Arc<ComponentRegistry>) -> Self {
        self.instantiator = Instantiator::new(registry);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Whether a Shadow View has been compiled and cached.
    pub fn is_compiled(&self) -> bool {
        matches!(self.compiled.get(), Some(Ok(_)))
    }

    /// The cached Shadow View, compiling it on first call. A failed
    /// compilation is cached as well and reported on every call.
    pub fn shadow_view(&self) -> Result<Arc<ShadowView>> {
        self.compiled
            .get_or_init(|| {
                ShadowViewCompiler::new(&self.config)
                    .compile(&self.text, None)
                    .map(Arc::new)
            })
            .clone()
    }

    /// Interpolate `values` into the text. Never compiles.
    pub fn apply(&self, values: &Value) -> String {
        interpolate::apply(&self.text, values)
    }

    /// Compile if needed, then build one instance of `class_name` (or the
    /// configured default class) configured with `data`.
    pub fn compile_view(&self, class_name: Option<&str>, data: Option<&Value>) -> Result<Instance> {
        let view = self.shadow_view()?;
        self.instantiator.instantiate(&view, class_name, data)
    }

    /// Merge the template into an existing instance: a clone of the skeleton
    /// is appended under the instance root and its bindings are installed on
    /// the instance. Values the instance already holds for those properties
    /// are written into the new locations. Returns the appended root.
    pub fn extend_component(&self, instance: &mut Instance) -> Result<NodeId> {
        let view = self.shadow_view()?;
        let root = {
            let mut doc = instance.dom().borrow_mut();
            let root = doc
                .import(view.skeleton(), view.root())
                .ok_or_else(|| Error::BindingResolution {
                    property: instance.class_name().to_string(),
                    path: "/".to_string(),
                })?;
            doc.append_child(instance.root(), root);
            root
        };

        let instantiator = instance.instantiator().clone();
        instantiator.bind(&view, instance, root);

        let held: Vec<(String, Value)> = view
            .bindings()
            .filter_map(|binding| {
                let value = instance.get(binding.name())?.clone();
                Some((binding.name().to_string(), value))
            })
            .collect();
        for (name, value) in held {
            instance.assign(&name, value)?;
        }
        Ok(root)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source_url", &self.config.source_url)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}
