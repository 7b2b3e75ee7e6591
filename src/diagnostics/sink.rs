// src/diagnostics/sink.rs

use crate::listener::EventArgs;

/// Optional observer notified around dispatches.
///
/// Never required for correctness; a manager without a sink makes no calls.
#[cfg_attr(test, mockall::automock)]
pub trait InstrumentationSink: Send + Sync {
    /// Called before anything else happens in a dispatch.
    fn on_dispatch_start(&self, event: &str, args: &EventArgs);

    /// Called after every listener ran. Not called when the event has no
    /// registrations or the dispatch failed.
    fn on_dispatch_end(&self, event: &str, args: &EventArgs);

    /// Called instead of `on_dispatch_end` when the dispatch started but did
    /// not run to completion: the event had no registrations or it failed.
    fn on_dispatch_abandoned(&self, _event: &str) {}

    /// Called with the full list of inline callback descriptions of `event`
    /// whenever one is added.
    fn on_inline_callbacks(&self, _event: &str, _callbacks: &[String]) {}
}
