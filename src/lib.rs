// src/lib.rs
// lazy-evm - Synchronous event manager with lazily resolved listeners
//
// Architecture:
// - Registry: per-event, identity-keyed, insertion-ordered listener sets
// - Lazy: subscribers expand on first use, deferred listener services
//   resolve on first use of their event
// - Re-entrant: listeners may dispatch, register and look up while running
// - Explicit: policies for resolution failures and missing methods are config

// ============================================================================
// CORE
// ============================================================================

pub mod error;
pub mod events;
pub mod listener;
pub mod registry;
pub mod subscribers;

// ============================================================================
// SERVICES & WIRING
// ============================================================================

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod services;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use app::{bootstrap, bootstrap_traced};
pub use config::{EventManagerConfig, MissingMethodPolicy, ResolutionFailure, TaggedListener};
pub use diagnostics::{DispatchTrace, InstrumentationSink, TraceOptions};
pub use error::{EvmError, EvmResult};
pub use events::{EventManager, EventManagerBuilder, EventNames};
pub use listener::{EventArgs, FnListener, InvokeMethod, Listener, MethodTable};
pub use registry::{IdentityKey, ListenerRef, RegistrationEntry, ResolutionCell};
pub use services::{ResolveError, ServiceContainer, ServiceResolver};
pub use subscribers::{SubscribedEvents, Subscriber};
