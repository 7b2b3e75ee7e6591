// src/subscribers/registration.rs
//
// Expansion of a subscriber into individual listener registrations.

use std::fmt;
use std::sync::Arc;

use super::{SubscribedEvents, Subscriber};
use crate::listener::Listener;
use crate::registry::ListenerRef;

/// A subscriber captured together with its declared events.
#[derive(Clone)]
pub struct SubscriberRegistration {
    listener: Arc<dyn Listener>,
    events: SubscribedEvents,
}

impl SubscriberRegistration {
    /// Reads the subscriber's declaration once.
    pub fn capture<S>(subscriber: &Arc<S>) -> Self
    where
        S: Subscriber + 'static,
    {
        let events = subscriber.subscribed_events();
        let listener: Arc<dyn Listener> = Arc::clone(subscriber) as Arc<dyn Listener>;
        Self { listener, events }
    }

    pub fn events(&self) -> &SubscribedEvents {
        &self.events
    }

    /// One `(event, listener)` pair per declared event.
    ///
    /// Plain declarations register the subscriber itself; method declarations
    /// register the `(subscriber, method)` pair.
    pub fn registrations(&self) -> Vec<(String, ListenerRef)> {
        match &self.events {
            SubscribedEvents::Events(events) => events
                .iter()
                .map(|event| (event.clone(), ListenerRef::Concrete(Arc::clone(&self.listener))))
                .collect(),
            SubscribedEvents::Methods(methods) => methods
                .iter()
                .map(|(event, method)| {
                    (
                        event.clone(),
                        ListenerRef::ConcreteMethod(Arc::clone(&self.listener), method.clone()),
                    )
                })
                .collect(),
        }
    }
}

impl fmt::Debug for SubscriberRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistration")
            .field("subscriber", &self.listener.describe())
            .field("events", &self.events)
            .finish()
    }
}
