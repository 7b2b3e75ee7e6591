// src/listener/callbacks.rs
//
// Closure-backed listeners.

use std::collections::HashMap;
use std::fmt;

use super::{EventArgs, Listener};

type Handler = Box<dyn Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync>;

/// A single closure exposed through the invoke capability.
pub struct FnListener<F> {
    description: String,
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(description: impl Into<String>, callback: F) -> Self {
        Self {
            description: description.into(),
            callback,
        }
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync,
{
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn is_invocable(&self) -> bool {
        true
    }

    fn invoke(&self, args: &EventArgs) -> anyhow::Result<()> {
        (self.callback)(args)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A listener assembled from named closures.
///
/// ```ignore
/// let listener = MethodTable::new("audit")
///     .on("postPersist", |_| Ok(()))
///     .on("onFlush", |_| Ok(()));
/// ```
pub struct MethodTable {
    name: String,
    methods: HashMap<String, Handler>,
    fallback: Option<Handler>,
}

impl MethodTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
            fallback: None,
        }
    }

    /// Adds (or replaces) the handler for `method`.
    pub fn on<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), Box::new(handler));
        self
    }

    /// Makes the table invocable; used for events without a named handler.
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }
}

impl Listener for MethodTable {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    fn call(&self, method: &str, args: &EventArgs) -> anyhow::Result<()> {
        match self.methods.get(method) {
            Some(handler) => handler(args),
            None => anyhow::bail!("{} has no method '{}'", self.name, method),
        }
    }

    fn is_invocable(&self) -> bool {
        self.fallback.is_some()
    }

    fn invoke(&self, args: &EventArgs) -> anyhow::Result<()> {
        match &self.fallback {
            Some(handler) => handler(args),
            None => anyhow::bail!("{} is not invocable", self.name),
        }
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("MethodTable")
            .field("name", &self.name)
            .field("methods", &methods)
            .field("invocable", &self.fallback.is_some())
            .finish()
    }
}
