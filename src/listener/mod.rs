// src/listener/mod.rs
//
// Listener contract: payloads, capability rule, closure helpers.

mod args;
mod callbacks;
mod capability;

pub use args::EventArgs;
pub use callbacks::{FnListener, MethodTable};
pub use capability::{InvokeMethod, Listener, INVOKE_METHOD};
