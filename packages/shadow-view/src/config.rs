//! Template configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_ITERATION_ATTRIBUTE: &str = "data-repeat";
pub const DEFAULT_SOURCE_URL: &str = "template.html";
pub const DEFAULT_COMPONENT_CLASS: &str = "Component";

/// Options controlling how a template is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateConfig {
    /// Attribute marking an element as an iteration region. Its value names
    /// the property that drives the region.
    pub iteration_attribute: String,
    /// Keep whitespace-only text nodes in the skeleton.
    pub preserve_whitespace: bool,
    /// Name reported in diagnostics.
    pub source_url: String,
    /// Target class used when a caller does not name one.
    pub default_class: String,
}

impl TemplateConfig {
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_iteration_attribute(mut self, name: impl Into<String>) -> Self {
        self.iteration_attribute = name.into();
        self
    }

    pub fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            iteration_attribute: DEFAULT_ITERATION_ATTRIBUTE.to_string(),
            preserve_whitespace: false,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            default_class: DEFAULT_COMPONENT_CLASS.to_string(),
        }
    }
}
