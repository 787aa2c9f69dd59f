//! Instantiation of compiled views into live, reactive instances

pub mod component;
pub mod instance;
pub mod instantiator;
pub mod iteration;

pub use component::{Component, ComponentFactory, ComponentRegistry, GenericComponent};
pub use instance::{Instance, PropertyAccessor, ResolvedLocation};
pub use instantiator::Instantiator;
pub use iteration::IterationState;
