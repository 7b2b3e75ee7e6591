// src/app/mod.rs
//
// Application-level wiring.

mod bootstrap;

pub use bootstrap::{bootstrap, bootstrap_traced};
