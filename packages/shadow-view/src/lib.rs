#![deny(clippy::all)]

//! Shadow View template engine
//!
//! Compiles `${name}` placeholder markup once into an immutable Shadow View
//! and stamps out independently mutable instances from it. Bound locations
//! are recorded as structural paths and re-resolved against every clone.

// Support modules
pub mod chars;
pub mod config;
mod error;
pub mod parse_util;
pub mod value;

// Node tree and markup
pub mod dom;
pub mod markup;

// Compilation and instantiation
pub mod runtime;
pub mod template;

// Re-exports
pub use config::TemplateConfig;
pub use error::{Error, Result};
pub use runtime::{
    Component, ComponentRegistry, GenericComponent, Instance, Instantiator, PropertyAccessor,
};
pub use template::{ShadowView, ShadowViewCompiler, StructuralPath, Template, ViewSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
