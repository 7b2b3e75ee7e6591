// src/events/bus/mod.rs

mod event_manager;
mod event_names;


pub use event_manager::{EventManager, EventManagerBuilder};
pub use event_names::EventNames;
