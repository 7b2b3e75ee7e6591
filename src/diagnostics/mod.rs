// src/diagnostics/mod.rs
//
// Instrumentation around dispatches.

mod sink;
mod trace;

pub use sink::InstrumentationSink;
pub use trace::{DispatchNode, DispatchRecord, DispatchTrace, TraceOptions, TraceSummary};

#[cfg(test)]
pub use sink::MockInstrumentationSink;
