// src/registry/listener_ref.rs

use std::fmt;
use std::sync::Arc;

use crate::listener::Listener;

/// The three shapes a listener can be registered in.
#[derive(Clone)]
pub enum ListenerRef {
    /// A ready listener; the method is chosen from the event name.
    Concrete(Arc<dyn Listener>),
    /// A ready listener invoked through an explicit method.
    ConcreteMethod(Arc<dyn Listener>, String),
    /// A service name resolved on first use of the event.
    Deferred(String),
}

impl ListenerRef {
    pub fn concrete<L>(listener: Arc<L>) -> Self
    where
        L: Listener + 'static,
    {
        ListenerRef::Concrete(listener)
    }

    pub fn method<L>(listener: Arc<L>, method: impl Into<String>) -> Self
    where
        L: Listener + 'static,
    {
        ListenerRef::ConcreteMethod(listener, method.into())
    }

    pub fn deferred(service: impl Into<String>) -> Self {
        ListenerRef::Deferred(service.into())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ListenerRef::Deferred(_))
    }

    /// The concrete listener, unless still deferred.
    pub fn listener(&self) -> Option<&Arc<dyn Listener>> {
        match self {
            ListenerRef::Concrete(listener) | ListenerRef::ConcreteMethod(listener, _) => {
                Some(listener)
            }
            ListenerRef::Deferred(_) => None,
        }
    }

    /// The service name of a deferred ref.
    pub fn handle(&self) -> Option<&str> {
        match self {
            ListenerRef::Deferred(service) => Some(service),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ListenerRef::Concrete(listener) => listener.describe(),
            ListenerRef::ConcreteMethod(listener, method) => {
                format!("{}::{}", listener.describe(), method)
            }
            ListenerRef::Deferred(service) => format!("@{service}"),
        }
    }
}

impl From<Arc<dyn Listener>> for ListenerRef {
    fn from(listener: Arc<dyn Listener>) -> Self {
        ListenerRef::Concrete(listener)
    }
}

impl fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerRef::Concrete(listener) => {
                f.debug_tuple("Concrete").field(&listener.describe()).finish()
            }
            ListenerRef::ConcreteMethod(listener, method) => f
                .debug_tuple("ConcreteMethod")
                .field(&listener.describe())
                .field(method)
                .finish(),
            ListenerRef::Deferred(service) => f.debug_tuple("Deferred").field(service).finish(),
        }
    }
}
