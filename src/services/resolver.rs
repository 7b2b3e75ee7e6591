// src/services/resolver.rs
//
// Service resolver boundary.
// Turns a deferred listener handle (a service name) into a concrete listener.

use std::sync::Arc;

use thiserror::Error;

use crate::listener::Listener;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Service '{0}' not found")]
    NotFound(String),

    #[error("Service '{name}' could not be created: {source}")]
    Failed {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Resolves deferred listener handles on demand.
///
/// The event manager calls this at most once per handle per event; it does
/// not cache results itself.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceResolver: Send + Sync {
    fn get_service(&self, name: &str) -> Result<Arc<dyn Listener>, ResolveError>;
}
