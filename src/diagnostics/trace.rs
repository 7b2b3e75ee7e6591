// src/diagnostics/trace.rs
//
// Recording instrumentation sink.
//
// Keeps, for debugging:
// - every dispatched event name, in order
// - a per-event dispatch log
// - the dispatch call tree (nested dispatches are children of the one running)
// - inline callback descriptions and wired listener service ids per event

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InstrumentationSink;
use crate::listener::EventArgs;
use crate::registry::lock;

/// Which parts of the trace are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Master switch; a disabled trace records nothing.
    pub enabled: bool,
    pub events: bool,
    pub dispatch_log: bool,
    pub dispatch_tree: bool,
    pub listeners: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            events: true,
            dispatch_log: true,
            dispatch_tree: true,
            listeners: true,
        }
    }
}

/// One dispatch as seen by the trace.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub dispatch_id: Uuid,
    pub event: String,
    pub occurred_at: DateTime<Utc>,
    pub has_args: bool,
}

/// A dispatch and the dispatches triggered while it ran.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchNode {
    pub record: DispatchRecord,
    pub children: Vec<DispatchNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub dispatches: usize,
    pub distinct_events: usize,
    pub logged_calls: usize,
}

#[derive(Debug, Default)]
struct TraceState {
    events: Vec<String>,
    dispatch_log: IndexMap<String, Vec<DispatchRecord>>,
    roots: Vec<DispatchNode>,
    open: Vec<DispatchNode>,
    inline_callbacks: HashMap<String, Vec<String>>,
    listener_ids: HashMap<String, Vec<String>>,
}

impl TraceState {
    /// Closes the innermost open dispatch.
    fn close(&mut self) {
        let Some(node) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Closed roots plus the currently open chain, folded into its parents.
    fn tree(&self) -> Vec<DispatchNode> {
        let mut tree = self.roots.clone();
        let mut pending: Option<DispatchNode> = None;
        for node in self.open.iter().rev() {
            let mut node = node.clone();
            if let Some(child) = pending.take() {
                node.children.push(child);
            }
            pending = Some(node);
        }
        tree.extend(pending);
        tree
    }
}

/// An [`InstrumentationSink`] that records dispatch activity in memory.
#[derive(Debug, Default)]
pub struct DispatchTrace {
    options: TraceOptions,
    state: Mutex<TraceState>,
}

impl DispatchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TraceOptions) -> Self {
        Self {
            options,
            state: Mutex::default(),
        }
    }

    /// Records which listener services are wired to each event.
    pub fn set_listener_ids(&self, listener_ids: HashMap<String, Vec<String>>) {
        if !self.options.enabled || !self.options.listeners {
            return;
        }
        lock(&self.state).listener_ids = listener_ids;
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).events.is_empty()
    }

    /// Every dispatched event name, in dispatch order.
    pub fn events(&self) -> Vec<String> {
        lock(&self.state).events.clone()
    }

    pub fn dispatch_log(&self) -> IndexMap<String, Vec<DispatchRecord>> {
        lock(&self.state).dispatch_log.clone()
    }

    pub fn calls_for(&self, event: &str) -> Vec<DispatchRecord> {
        lock(&self.state)
            .dispatch_log
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.state).dispatch_log.values().map(Vec::len).sum()
    }

    pub fn dispatch_tree(&self) -> Vec<DispatchNode> {
        lock(&self.state).tree()
    }

    pub fn inline_callbacks(&self, event: &str) -> Vec<String> {
        lock(&self.state)
            .inline_callbacks
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    pub fn listener_ids(&self, event: &str) -> Vec<String> {
        lock(&self.state)
            .listener_ids
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    pub fn summary(&self) -> TraceSummary {
        let state = lock(&self.state);
        let mut distinct: Vec<&String> = state.events.iter().collect();
        distinct.sort();
        distinct.dedup();
        TraceSummary {
            dispatches: state.events.len(),
            distinct_events: distinct.len(),
            logged_calls: state.dispatch_log.values().map(Vec::len).sum(),
        }
    }
}

impl InstrumentationSink for DispatchTrace {
    fn on_dispatch_start(&self, event: &str, args: &EventArgs) {
        if !self.options.enabled {
            return;
        }

        let record = DispatchRecord {
            dispatch_id: Uuid::new_v4(),
            event: event.to_string(),
            occurred_at: Utc::now(),
            has_args: !args.is_empty(),
        };

        let mut state = lock(&self.state);
        if self.options.events {
            state.events.push(event.to_string());
        }
        if self.options.dispatch_log {
            state
                .dispatch_log
                .entry(event.to_string())
                .or_default()
                .push(record.clone());
        }
        if self.options.dispatch_tree {
            state.open.push(DispatchNode {
                record,
                children: Vec::new(),
            });
        }
    }

    fn on_dispatch_end(&self, _event: &str, _args: &EventArgs) {
        if !self.options.enabled || !self.options.dispatch_tree {
            return;
        }
        lock(&self.state).close();
    }

    fn on_dispatch_abandoned(&self, _event: &str) {
        if !self.options.enabled || !self.options.dispatch_tree {
            return;
        }
        lock(&self.state).close();
    }

    fn on_inline_callbacks(&self, event: &str, callbacks: &[String]) {
        if !self.options.enabled {
            return;
        }
        lock(&self.state)
            .inline_callbacks
            .insert(event.to_string(), callbacks.to_vec());
    }
}
