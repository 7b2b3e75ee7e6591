// src/events/bus/event_manager.rs
//
// Core event manager implementation.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - listeners execute immediately in registration order
// 2. Lazy - subscribers expand on first registry access, deferred listener
//    services resolve on first use of their event
// 3. Re-entrant - no lock is held while listeners, the service resolver or
//    the instrumentation sink run
// 4. Observable - every dispatch is logged

use std::fmt;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use log::{debug, warn};

use super::EventNames;
use crate::config::{EventManagerConfig, MissingMethodPolicy, ResolutionFailure};
use crate::diagnostics::InstrumentationSink;
use crate::error::{EvmError, EvmResult};
use crate::listener::{EventArgs, FnListener, InvokeMethod};
use crate::registry::resolution::ensure_resolved;
use crate::registry::{lock, ListenerRef, RegistrationEntry, RegistryState, ResolutionCell};
use crate::services::{ServiceContainer, ServiceResolver};
use crate::subscribers::{Subscriber, SubscriberRegistration};

/// The event manager.
///
/// Registers listeners and subscribers per event name and dispatches events
/// to them. Cloning is cheap and every clone shares the same registry, so a
/// listener can hold a clone and dispatch nested events.
#[derive(Clone)]
pub struct EventManager {
    state: Arc<Mutex<RegistryState>>,
    resolver: Arc<dyn ServiceResolver>,
    sink: Option<Arc<dyn InstrumentationSink>>,
    resolution_failure: ResolutionFailure,
    missing_method: MissingMethodPolicy,
}

impl EventManager {
    /// Creates an event manager resolving deferred listeners through `resolver`.
    pub fn new(resolver: Arc<dyn ServiceResolver>) -> Self {
        Self::builder(resolver).build()
    }

    pub fn builder(resolver: Arc<dyn ServiceResolver>) -> EventManagerBuilder {
        EventManagerBuilder {
            resolver,
            sink: None,
            resolution_failure: ResolutionFailure::default(),
            missing_method: MissingMethodPolicy::default(),
        }
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Registers `listener` for every event in `events`.
    ///
    /// Registering the same identity again for an event replaces the earlier
    /// registration in place.
    pub fn add_listener(&self, events: impl Into<EventNames>, listener: ListenerRef) {
        self.ensure_subscribers_expanded();

        let mut state = lock(&self.state);
        for event in events.into() {
            let key = state.insert(&event, listener.clone());
            debug!("listener {} registered for '{}' as {}", listener.describe(), event, key);
        }
    }

    /// Removes `listener` from every event in `events`.
    ///
    /// A deferred listener can be removed by its service name even after it
    /// was resolved. Unknown events and listeners are ignored.
    pub fn remove_listener(&self, events: impl Into<EventNames>, listener: &ListenerRef) {
        self.ensure_subscribers_expanded();

        let mut state = lock(&self.state);
        for event in events.into() {
            if state.remove(&event, listener) {
                debug!("listener {} removed from '{}'", listener.describe(), event);
            }
        }
    }

    /// Registers a subscriber for the events it declares.
    ///
    /// The declaration is read once, here. Before the registry is first used
    /// the subscriber is only recorded; its listeners materialize on the first
    /// registry access of any kind. An event declared twice registers once.
    pub fn add_subscriber<S>(&self, subscriber: Arc<S>)
    where
        S: Subscriber + 'static,
    {
        let registration = SubscriberRegistration::capture(&subscriber);

        let mut state = lock(&self.state);
        if !state.subscribers_expanded {
            debug!(
                "subscriber {} recorded for expansion ({:?})",
                subscriber.describe(),
                registration.events().event_names()
            );
            state.pending.push(registration);
            return;
        }

        for (event, listener) in registration.registrations() {
            state.insert(&event, listener);
        }
        debug!(
            "subscriber {} registered for {:?}",
            subscriber.describe(),
            registration.events().event_names()
        );
    }

    /// Removes every registration the subscriber's declaration produces.
    pub fn remove_subscriber<S>(&self, subscriber: &Arc<S>)
    where
        S: Subscriber + 'static,
    {
        self.ensure_subscribers_expanded();

        let registration = SubscriberRegistration::capture(subscriber);
        let mut state = lock(&self.state);
        for (event, listener) in registration.registrations() {
            state.remove(&event, &listener);
        }
        debug!("subscriber {} removed", subscriber.describe());
    }

    /// Registers an inline closure for `event` and reports the event's inline
    /// callbacks to the instrumentation sink.
    ///
    /// Returns the registration so the closure can be removed later.
    pub fn add_callback<F>(&self, event: &str, description: impl Into<String>, callback: F) -> ListenerRef
    where
        F: Fn(&EventArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let description = description.into();
        let listener = ListenerRef::concrete(Arc::new(FnListener::new(description.clone(), callback)));
        self.add_listener(event, listener.clone());

        let callbacks = {
            let mut state = lock(&self.state);
            let callbacks = state.inline_callbacks.entry(event.to_string()).or_default();
            callbacks.push(description);
            callbacks.clone()
        };
        if let Some(sink) = &self.sink {
            sink.on_inline_callbacks(event, &callbacks);
        }
        listener
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Whether `event` has any registration. Does not resolve deferred listeners.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.ensure_subscribers_expanded();

        lock(&self.state)
            .events
            .get(event)
            .is_some_and(|event_state| !event_state.is_empty())
    }

    /// Resolved registrations of `event`, in registration order.
    pub fn get_listeners(&self, event: &str) -> EvmResult<Vec<RegistrationEntry>> {
        self.ensure_subscribers_expanded();
        self.ensure_resolved(event)?;

        Ok(lock(&self.state)
            .events
            .get(event)
            .map(|event_state| event_state.entries())
            .unwrap_or_default())
    }

    /// Resolved registrations of every known event.
    pub fn get_all_listeners(&self) -> EvmResult<IndexMap<String, Vec<RegistrationEntry>>> {
        self.ensure_subscribers_expanded();

        let events: Vec<String> = lock(&self.state).events.keys().cloned().collect();
        for event in &events {
            self.ensure_resolved(event)?;
        }

        Ok(lock(&self.state)
            .events
            .iter()
            .map(|(event, event_state)| (event.clone(), event_state.entries()))
            .collect())
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Dispatches `event` to its listeners.
    ///
    /// Listeners run in registration order, each receiving `args` (or
    /// [`EventArgs::empty`]). An event nobody registered for is a no-op. The
    /// first listener error aborts the dispatch.
    ///
    /// The sink sees `on_dispatch_end` only after every listener ran; an
    /// unknown event or a failed dispatch reports `on_dispatch_abandoned`.
    pub fn dispatch(&self, event: &str, args: Option<EventArgs>) -> EvmResult<()> {
        let args = args.unwrap_or_default();

        if let Some(sink) = &self.sink {
            sink.on_dispatch_start(event, &args);
        }

        let completed = self.run_listeners(event, &args);

        if let Some(sink) = &self.sink {
            match &completed {
                Ok(true) => sink.on_dispatch_end(event, &args),
                Ok(false) | Err(_) => sink.on_dispatch_abandoned(event),
            }
        }
        completed.map(|_| ())
    }

    /// Runs every listener of `event`. `Ok(false)` when nobody registered.
    fn run_listeners(&self, event: &str, args: &EventArgs) -> EvmResult<bool> {
        self.ensure_subscribers_expanded();
        if !lock(&self.state).events.contains_key(event) {
            return Ok(false);
        }

        self.ensure_resolved(event)?;

        let (resolution, entries) = {
            let state = lock(&self.state);
            match state.events.get(event) {
                Some(event_state) => (event_state.resolution(), event_state.entries()),
                None => return Ok(false),
            }
        };
        debug!("[EVENT] {} | {} listeners", event, entries.len());

        for entry in &entries {
            self.invoke(event, entry, resolution, args)?;
        }
        Ok(true)
    }

    fn invoke(
        &self,
        event: &str,
        entry: &RegistrationEntry,
        resolution: ResolutionCell,
        args: &EventArgs,
    ) -> EvmResult<()> {
        let (Some(listener), Some(method)) = (entry.listener().listener(), entry.method()) else {
            let handle = entry.listener().handle().unwrap_or_default().to_string();
            if resolution == ResolutionCell::Resolving {
                // Nested dispatch while this event is still being resolved.
                debug!("skipping listener service '{}' of '{}': not resolved yet", handle, event);
                return Ok(());
            }
            return Err(EvmError::Unresolved {
                event: event.to_string(),
                handle,
            });
        };

        let result = match method {
            InvokeMethod::Named(name) => listener.call(name, args),
            InvokeMethod::Invoke => listener.invoke(args),
            InvokeMethod::Missing(name) => {
                if self.missing_method == MissingMethodPolicy::Skip {
                    warn!(
                        "skipping listener {} for '{}': no method '{}' and not invocable",
                        listener.describe(),
                        event,
                        name
                    );
                    return Ok(());
                }
                return Err(EvmError::MissingMethod {
                    event: event.to_string(),
                    listener: listener.describe(),
                    method: name.clone(),
                });
            }
        };

        result.map_err(|source| EvmError::Listener {
            event: event.to_string(),
            listener: listener.describe(),
            source,
        })
    }

    // ========================================================================
    // LAZY INITIALIZATION
    // ========================================================================

    fn ensure_subscribers_expanded(&self) {
        let mut state = lock(&self.state);
        if state.subscribers_expanded {
            return;
        }
        state.subscribers_expanded = true;

        let pending = std::mem::take(&mut state.pending);
        for registration in &pending {
            for (event, listener) in registration.registrations() {
                state.insert(&event, listener);
            }
        }
        if !pending.is_empty() {
            debug!("{} subscribers expanded", pending.len());
        }
    }

    fn ensure_resolved(&self, event: &str) -> EvmResult<()> {
        ensure_resolved(&self.state, event, self.resolver.as_ref(), self.resolution_failure)
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("EventManager")
            .field("events", &state.events.keys().collect::<Vec<_>>())
            .field("pending_subscribers", &state.pending.len())
            .field("resolution_failure", &self.resolution_failure)
            .field("missing_method", &self.missing_method)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for EventManager {
    /// An event manager backed by an empty [`ServiceContainer`].
    fn default() -> Self {
        Self::new(Arc::new(ServiceContainer::new()))
    }
}

/// Step-by-step construction of an [`EventManager`].
pub struct EventManagerBuilder {
    resolver: Arc<dyn ServiceResolver>,
    sink: Option<Arc<dyn InstrumentationSink>>,
    resolution_failure: ResolutionFailure,
    missing_method: MissingMethodPolicy,
}

impl EventManagerBuilder {
    pub fn sink(mut self, sink: Arc<dyn InstrumentationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn resolution_failure(mut self, failure: ResolutionFailure) -> Self {
        self.resolution_failure = failure;
        self
    }

    pub fn missing_method(mut self, policy: MissingMethodPolicy) -> Self {
        self.missing_method = policy;
        self
    }

    /// Applies the policies of `config`. Tagged listeners are wired by
    /// [`bootstrap`](crate::app::bootstrap).
    pub fn config(self, config: &EventManagerConfig) -> Self {
        self.resolution_failure(config.resolution_failure)
            .missing_method(config.missing_method)
    }

    pub fn build(self) -> EventManager {
        EventManager {
            state: Arc::new(Mutex::new(RegistryState::default())),
            resolver: self.resolver,
            sink: self.sink,
            resolution_failure: self.resolution_failure,
            missing_method: self.missing_method,
        }
    }
}
