// src/registry/event_state.rs
//
// Per-event listener registry.
//
// INVARIANTS:
// - Entry keys are unique; inserting an existing key replaces the entry in place
// - Iteration order is insertion order, including across lazy resolution
// - remap only holds keys that started as deferred handles and were resolved

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{identity_of, IdentityKey, ListenerRef};
use crate::config::ResolutionFailure;
use crate::listener::{InvokeMethod, Listener};

/// Lazy resolution progress of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionCell {
    /// Deferred handles may be waiting.
    #[default]
    Unresolved,
    /// A resolution pass is running; nested readers see a partial state.
    Resolving,
    /// The pass completed (or failed and is configured not to retry).
    Resolved,
}

/// One listener registered for one event.
#[derive(Debug, Clone)]
pub struct RegistrationEntry {
    event: String,
    key: IdentityKey,
    listener: ListenerRef,
    method: Option<InvokeMethod>,
}

impl RegistrationEntry {
    fn new(event: &str, listener: ListenerRef) -> Self {
        let method = match &listener {
            ListenerRef::Concrete(concrete) => Some(InvokeMethod::select(concrete.as_ref(), event)),
            ListenerRef::ConcreteMethod(concrete, method) => {
                Some(InvokeMethod::select(concrete.as_ref(), method))
            }
            ListenerRef::Deferred(_) => None,
        };

        Self {
            event: event.to_string(),
            key: identity_of(&listener),
            listener,
            method,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn key(&self) -> &IdentityKey {
        &self.key
    }

    pub fn listener(&self) -> &ListenerRef {
        &self.listener
    }

    /// The selected invocation method; `None` while the listener is deferred.
    pub fn method(&self) -> Option<&InvokeMethod> {
        self.method.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        !self.listener.is_deferred()
    }
}

/// Registry state of a single event.
#[derive(Debug, Default)]
pub struct EventState {
    resolution: ResolutionCell,
    entries: IndexMap<IdentityKey, RegistrationEntry>,
    remap: HashMap<IdentityKey, IdentityKey>,
}

impl EventState {
    /// Adds or overrides a registration. Returns its key.
    ///
    /// A deferred handle forgets any earlier resolution of that handle and
    /// re-opens the event for resolution; concrete listeners never do.
    pub fn insert(&mut self, event: &str, listener: ListenerRef) -> IdentityKey {
        let entry = RegistrationEntry::new(event, listener);
        let key = entry.key.clone();

        if entry.listener.is_deferred() {
            self.remap.remove(&key);
            if self.resolution == ResolutionCell::Resolved {
                self.resolution = ResolutionCell::Unresolved;
            }
        }

        self.entries.insert(key.clone(), entry);
        key
    }

    /// Removes a registration, following a deferred handle to the listener
    /// it resolved to. Returns whether an entry was removed.
    pub fn remove(&mut self, listener: &ListenerRef) -> bool {
        let mut key = identity_of(listener);
        if let Some(resolved) = self.remap.remove(&key) {
            key = resolved;
        }
        self.entries.shift_remove(&key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn resolution(&self) -> ResolutionCell {
        self.resolution
    }

    /// Current entries in order.
    pub fn entries(&self) -> Vec<RegistrationEntry> {
        self.entries.values().cloned().collect()
    }

    /// The key a deferred key was resolved to, if any.
    pub fn remapped(&self, key: &IdentityKey) -> Option<&IdentityKey> {
        self.remap.get(key)
    }

    /// Moves Unresolved to Resolving. False when resolution is running or done.
    pub(crate) fn begin_resolution(&mut self) -> bool {
        if self.resolution != ResolutionCell::Unresolved {
            return false;
        }
        self.resolution = ResolutionCell::Resolving;
        true
    }

    /// First still-deferred entry, in order.
    pub(crate) fn next_deferred(&self) -> Option<(IdentityKey, String)> {
        self.entries.values().find_map(|entry| {
            entry
                .listener
                .handle()
                .map(|service| (entry.key.clone(), service.to_string()))
        })
    }

    /// Replaces the deferred entry `old_key` with `listener`, keeping its
    /// position. If the listener is already registered, the earlier position
    /// wins. Returns the new key, or `None` when `old_key` is gone.
    pub(crate) fn apply_resolved(
        &mut self,
        event: &str,
        old_key: &IdentityKey,
        listener: Arc<dyn Listener>,
    ) -> Option<IdentityKey> {
        let index = self.entries.get_index_of(old_key)?;
        let entry = RegistrationEntry::new(event, ListenerRef::Concrete(listener));
        let new_key = entry.key.clone();

        match self.entries.get_index_of(&new_key) {
            Some(existing) if existing < index => {
                self.entries.shift_remove_index(index);
                self.entries[existing] = entry;
            }
            Some(existing) => {
                self.entries.shift_remove_index(existing);
                self.entries.shift_remove_index(index);
                self.entries.shift_insert(index, new_key.clone(), entry);
            }
            None => {
                self.entries.shift_remove_index(index);
                self.entries.shift_insert(index, new_key.clone(), entry);
            }
        }

        self.remap.insert(old_key.clone(), new_key.clone());
        Some(new_key)
    }

    pub(crate) fn finish_resolution(&mut self) {
        self.resolution = ResolutionCell::Resolved;
    }

    pub(crate) fn fail_resolution(&mut self, failure: ResolutionFailure) {
        self.resolution = match failure {
            ResolutionFailure::Sticky => ResolutionCell::Resolved,
            ResolutionFailure::Retry => ResolutionCell::Unresolved,
        };
    }
}
