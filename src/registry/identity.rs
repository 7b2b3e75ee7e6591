// src/registry/identity.rs
//
// Identity keys for listener registrations.
//
// RULES:
// - Concrete listeners are identified by the address of their shared allocation
// - An explicit method is part of the key
// - Deferred handles are identified by their service name under a reserved prefix
// - Registering the same identity again overrides, never duplicates

use std::fmt;
use std::sync::Arc;

use super::ListenerRef;
use crate::listener::Listener;

/// Prefix reserved for deferred service handles.
pub const SERVICE_PREFIX: &str = "_service_";

const METHOD_SEPARATOR: &str = "_method_";

/// Deterministic key deduplicating registrations of "the same" listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for keys computed from a deferred handle.
    pub fn is_deferred(&self) -> bool {
        self.0.starts_with(SERVICE_PREFIX)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the identity key of a registration.
///
/// Stable for as long as the referenced listener is alive; every registry
/// entry holds its listener, so a registered key never goes stale.
pub fn identity_of(listener: &ListenerRef) -> IdentityKey {
    match listener {
        ListenerRef::Concrete(listener) => IdentityKey(object_id(listener)),
        ListenerRef::ConcreteMethod(listener, method) => {
            IdentityKey(format!("{}{}{}", object_id(listener), METHOD_SEPARATOR, method))
        }
        ListenerRef::Deferred(service) => IdentityKey(format!("{SERVICE_PREFIX}{service}")),
    }
}

fn object_id(listener: &Arc<dyn Listener>) -> String {
    format!("{:016x}", Arc::as_ptr(listener) as *const () as usize)
}
