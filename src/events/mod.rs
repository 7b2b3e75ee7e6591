// src/events/mod.rs
//
// Events Module - Synchronous Event Manager
//
// Listeners and subscribers register per event name; dispatch runs them in
// registration order on the calling thread.

pub mod bus;

pub use bus::{EventManager, EventManagerBuilder, EventNames};
