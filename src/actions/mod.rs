//! Callable actions the driving model (and the controller) can invoke.

pub mod builtin;
pub mod registry;

pub use registry::{ActionDescriptor, ActionKind, ActionRegistry};
