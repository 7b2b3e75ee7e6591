// src/subscribers/subscriber.rs

use crate::listener::Listener;

/// A listener that declares the events it handles.
pub trait Subscriber: Listener {
    fn subscribed_events(&self) -> SubscribedEvents;
}

/// The two declaration shapes a subscriber can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribedEvents {
    /// Each event is handled by the method of the same name.
    Events(Vec<String>),
    /// Each event is handled by the paired method.
    Methods(Vec<(String, String)>),
}

impl SubscribedEvents {
    pub fn events<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SubscribedEvents::Events(events.into_iter().map(Into::into).collect())
    }

    pub fn methods<I, E, M>(methods: I) -> Self
    where
        I: IntoIterator<Item = (E, M)>,
        E: Into<String>,
        M: Into<String>,
    {
        SubscribedEvents::Methods(
            methods
                .into_iter()
                .map(|(event, method)| (event.into(), method.into()))
                .collect(),
        )
    }

    /// Declared event names, in order.
    pub fn event_names(&self) -> Vec<&str> {
        match self {
            SubscribedEvents::Events(events) => events.iter().map(String::as_str).collect(),
            SubscribedEvents::Methods(methods) => {
                methods.iter().map(|(event, _)| event.as_str()).collect()
            }
        }
    }
}

impl From<Vec<&str>> for SubscribedEvents {
    fn from(events: Vec<&str>) -> Self {
        SubscribedEvents::events(events)
    }
}

impl From<Vec<(&str, &str)>> for SubscribedEvents {
    fn from(methods: Vec<(&str, &str)>) -> Self {
        SubscribedEvents::methods(methods)
    }
}
