// src/services/container.rs
//
// In-memory service container.
//
// RULES:
// - Each service is built at most once, on first request
// - Every request for a name returns the same shared instance
// - Unknown names are reported as ResolveError::NotFound

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use super::{ResolveError, ServiceResolver};
use crate::listener::Listener;

type Factory = Box<dyn Fn() -> anyhow::Result<Arc<dyn Listener>> + Send + Sync>;

/// Named listener factories with shared, lazily created instances.
#[derive(Default)]
pub struct ServiceContainer {
    factories: HashMap<String, Factory>,
    instances: Mutex<HashMap<String, Arc<dyn Listener>>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an infallible factory for `name`.
    pub fn register<L, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        L: Listener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.factories.insert(
            name.into(),
            Box::new(move || Ok(Arc::new(factory()) as Arc<dyn Listener>)),
        );
        self
    }

    /// Registers a factory that may fail.
    pub fn try_register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Arc<dyn Listener>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Registers an already built instance.
    pub fn insert<L>(&mut self, name: impl Into<String>, instance: Arc<L>) -> &mut Self
    where
        L: Listener + 'static,
    {
        let instance: Arc<dyn Listener> = instance;
        self.factories
            .insert(name.into(), Box::new(move || Ok(Arc::clone(&instance))));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Whether `name` has already been built.
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

impl ServiceResolver for ServiceContainer {
    fn get_service(&self, name: &str) -> Result<Arc<dyn Listener>, ResolveError> {
        if let Some(instance) = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(instance));
        }

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;

        // Built without the lock held; factories may resolve other services.
        let built = factory().map_err(|source| ResolveError::Failed {
            name: name.to_string(),
            source,
        })?;
        debug!("service '{}' instantiated", name);

        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            instances.entry(name.to_string()).or_insert(built),
        ))
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ServiceContainer")
            .field("services", &names)
            .finish_non_exhaustive()
    }
}
