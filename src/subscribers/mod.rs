// src/subscribers/mod.rs
//
// Subscribers: listeners that declare their own events.

mod registration;
mod subscriber;

pub use registration::SubscriberRegistration;
pub use subscriber::{SubscribedEvents, Subscriber};
