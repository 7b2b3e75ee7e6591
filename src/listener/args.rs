// src/listener/args.rs
//
// Event payload passed to every listener of a dispatch.
// The payload is type-erased; listeners downcast to the concrete type they expect.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Optional, shared, type-erased event payload.
///
/// A dispatch without arguments hands listeners [`EventArgs::empty`].
#[derive(Clone, Default)]
pub struct EventArgs {
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl EventArgs {
    /// The shared "no arguments" value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            payload: Some(Arc::new(value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Borrows the payload as `T`, or `None` when empty or of another type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload {
            Some(_) => f.write_str("EventArgs(..)"),
            None => f.write_str("EventArgs(empty)"),
        }
    }
}
