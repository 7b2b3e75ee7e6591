// src/events/bus/event_names.rs

/// One or several event names accepted by registration calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNames(Vec<String>);

impl IntoIterator for EventNames {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<&str> for EventNames {
    fn from(event: &str) -> Self {
        Self(vec![event.to_string()])
    }
}

impl From<String> for EventNames {
    fn from(event: String) -> Self {
        Self(vec![event])
    }
}

impl From<&String> for EventNames {
    fn from(event: &String) -> Self {
        Self(vec![event.clone()])
    }
}

impl From<Vec<String>> for EventNames {
    fn from(events: Vec<String>) -> Self {
        Self(events)
    }
}

impl From<Vec<&str>> for EventNames {
    fn from(events: Vec<&str>) -> Self {
        Self(events.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EventNames {
    fn from(events: &[&str]) -> Self {
        Self(events.iter().map(|event| event.to_string()).collect())
    }
}

impl From<&[String]> for EventNames {
    fn from(events: &[String]) -> Self {
        Self(events.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for EventNames {
    fn from(events: [&str; N]) -> Self {
        Self(events.iter().map(|event| event.to_string()).collect())
    }
}
