// src/registry/mod.rs
//
// Listener registry: identity keys, per-event state, lazy resolution.

mod event_state;
mod identity;
mod listener_ref;
pub(crate) mod resolution;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

pub use event_state::{EventState, RegistrationEntry, ResolutionCell};
pub use identity::{identity_of, IdentityKey, SERVICE_PREFIX};
pub use listener_ref::ListenerRef;

use crate::subscribers::SubscriberRegistration;

/// Everything one event manager owns.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    /// Flips once, on the first registry access of any kind.
    pub subscribers_expanded: bool,
    /// Subscribers recorded before expansion.
    pub pending: Vec<SubscriberRegistration>,
    pub events: IndexMap<String, EventState>,
    /// Descriptions of inline callbacks, per event.
    pub inline_callbacks: HashMap<String, Vec<String>>,
}

impl RegistryState {
    pub fn insert(&mut self, event: &str, listener: ListenerRef) -> IdentityKey {
        self.events
            .entry(event.to_string())
            .or_default()
            .insert(event, listener)
    }

    /// Removing from an unknown event is a no-op.
    pub fn remove(&mut self, event: &str, listener: &ListenerRef) -> bool {
        self.events
            .get_mut(event)
            .is_some_and(|event_state| event_state.remove(listener))
    }
}

/// Every mutation is applied in full under the lock, so a poisoned lock
/// still guards consistent state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
