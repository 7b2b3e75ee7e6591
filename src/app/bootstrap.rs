// src/app/bootstrap.rs
//
// Config-driven wiring of an event manager.
//
// CRITICAL RULES:
// - Tagged listeners are registered as deferred service handles; nothing is
//   resolved at startup
// - The configuration is validated before anything is registered
// - Policies come from the same configuration

use std::sync::Arc;

use log::info;

use crate::config::EventManagerConfig;
use crate::diagnostics::{DispatchTrace, InstrumentationSink};
use crate::error::EvmResult;
use crate::events::EventManager;
use crate::registry::ListenerRef;
use crate::services::ServiceResolver;

// ============================================================================
// EVENT MANAGER INITIALIZATION
// ============================================================================

/// Builds an event manager from `config`.
///
/// Every tagged listener is registered, for each of its events, as a
/// deferred handle that `resolver` turns into a listener on first use.
pub fn bootstrap(
    config: &EventManagerConfig,
    resolver: Arc<dyn ServiceResolver>,
    sink: Option<Arc<dyn InstrumentationSink>>,
) -> EvmResult<EventManager> {
    config.validate()?;

    let mut builder = EventManager::builder(resolver).config(config);
    if let Some(sink) = sink {
        builder = builder.sink(sink);
    }
    let manager = builder.build();

    for tagged in &config.listeners {
        manager.add_listener(tagged.events.clone(), ListenerRef::deferred(&tagged.service));
    }

    info!(
        "[EVM] event manager ready: {} tagged listeners, resolution failure {:?}, missing method {:?}",
        config.listeners.len(),
        config.resolution_failure,
        config.missing_method
    );
    Ok(manager)
}

/// Like [`bootstrap`], recording into `trace` and telling it which listener
/// services are wired to each event.
pub fn bootstrap_traced(
    config: &EventManagerConfig,
    resolver: Arc<dyn ServiceResolver>,
    trace: Arc<DispatchTrace>,
) -> EvmResult<EventManager> {
    let manager = bootstrap(config, resolver, Some(trace.clone()))?;
    trace.set_listener_ids(config.listener_ids());
    Ok(manager)
}
