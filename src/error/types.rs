// src/error/types.rs
use serde::Serialize;
use thiserror::Error;

use crate::services::ResolveError;

/// Every failure the event manager can surface.
///
/// All errors are synchronous and returned to the immediate caller of the
/// operation that triggered them.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("Failed to resolve listener service '{handle}' for event '{event}': {source}")]
    Resolution {
        event: String,
        handle: String,
        #[source]
        source: ResolveError,
    },

    #[error("Listener service '{handle}' for event '{event}' is still unresolved")]
    Unresolved { event: String, handle: String },

    #[error("Listener {listener} for event '{event}' has no method '{method}' and is not invocable")]
    MissingMethod {
        event: String,
        listener: String,
        method: String,
    },

    #[error("Listener {listener} failed while handling event '{event}': {source}")]
    Listener {
        event: String,
        listener: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvmError {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EvmError::Resolution { .. } => "resolution_failed",
            EvmError::Unresolved { .. } => "unresolved_listener",
            EvmError::MissingMethod { .. } => "missing_method",
            EvmError::Listener { .. } => "listener_failed",
            EvmError::Config(_) => "config",
            EvmError::Serialization(_) => "serialization",
            EvmError::Io(_) => "io",
        }
    }
}

impl Serialize for EvmError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type EvmResult<T> = Result<T, EvmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_keeps_source() {
        let err = EvmError::Resolution {
            event: "postPersist".to_string(),
            handle: "mailer".to_string(),
            source: ResolveError::NotFound("mailer".to_string()),
        };

        assert_eq!(err.as_label(), "resolution_failed");
        assert!(err.to_string().contains("'mailer'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = EvmError::Config("tagged listener 'mailer' declares no events".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            "\"Configuration error: tagged listener 'mailer' declares no events\""
        );
    }
}
