//! Error types for the frame relay.

use thiserror::Error;

/// Reasons an inbound cross-context payload is not a well-formed envelope.
///
/// Inbound traffic is untrusted: any window may post anything, so these are
/// expected and are never surfaced past the listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("Payload is not an object")]
    NotAnObject,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a string")]
    InvalidField(&'static str),

    #[error("Unknown message type: {0}")]
    UnknownMessageKind(String),

    #[error("Unknown message content: {0}")]
    UnknownContentKind(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// Errors returned by the relay's caller-facing API, configuration and CLI.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Malformed envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("Navigation can only be delegated from an embedded frame")]
    NotEmbedded,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unknown window: {0}")]
    UnknownWindow(crate::types::WindowId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<config::ConfigError> for RelayError {
    fn from(err: config::ConfigError) -> Self {
        RelayError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}
