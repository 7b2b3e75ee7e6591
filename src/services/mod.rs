// src/services/mod.rs
//
// Service lookup for deferred listeners.

mod container;
mod resolver;

pub use container::ServiceContainer;
pub use resolver::{ResolveError, ServiceResolver};

#[cfg(test)]
pub use resolver::MockServiceResolver;
