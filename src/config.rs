// src/config.rs
//
// Event manager configuration.
//
// Loaded from JSON; every field is optional and falls back to its default.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvmError, EvmResult};

/// What happens to an event whose deferred listener failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFailure {
    /// The event counts as resolved; the failed listener stays unresolved
    /// and every later dispatch of the event reports it.
    #[default]
    Sticky,
    /// The next access to the event retries resolution.
    Retry,
}

/// What a dispatch does with a listener that has no usable method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMethodPolicy {
    /// Fail the dispatch; remaining listeners are not invoked.
    #[default]
    Abort,
    /// Log a warning and continue with the next listener.
    Skip,
}

/// A listener service wired at startup by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedListener {
    pub service: String,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventManagerConfig {
    pub resolution_failure: ResolutionFailure,
    pub missing_method: MissingMethodPolicy,
    pub listeners: Vec<TaggedListener>,
}

impl EventManagerConfig {
    pub fn from_json_str(json: &str) -> EvmResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> EvmResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Tagged listeners need a service name and at least one event.
    pub fn validate(&self) -> EvmResult<()> {
        for tagged in &self.listeners {
            if tagged.service.trim().is_empty() {
                return Err(EvmError::Config(
                    "tagged listener has an empty service name".to_string(),
                ));
            }
            if tagged.events.is_empty() {
                return Err(EvmError::Config(format!(
                    "tagged listener '{}' declares no events",
                    tagged.service
                )));
            }
        }
        Ok(())
    }

    /// Service names wired to each event, in declaration order.
    pub fn listener_ids(&self) -> HashMap<String, Vec<String>> {
        let mut ids: HashMap<String, Vec<String>> = HashMap::new();
        for tagged in &self.listeners {
            for event in &tagged.events {
                ids.entry(event.clone())
                    .or_default()
                    .push(tagged.service.clone());
            }
        }
        ids
    }
}
