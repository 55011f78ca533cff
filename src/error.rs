//! Error types for the list controller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A failed exchange with the remote collection endpoint.
///
/// `payload` is whatever the server sent back (parsed JSON, or the raw body as a JSON
/// string). It is kept verbatim so the view can pull its own message out of it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct TransportFailure {
    pub status: Option<u16>,
    pub payload: Value,
    pub reason: String,
}

impl TransportFailure {
    pub fn new(status: Option<u16>, payload: Value, reason: impl Into<String>) -> Self {
        Self {
            status,
            payload,
            reason: reason.into(),
        }
    }
}

/// Controller-level errors
#[derive(Debug, Clone, Error)]
pub enum ListError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportFailure),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation disabled by customization: {0}")]
    Disabled(&'static str),

    #[error("No transport attached to the list controller")]
    NotReady,
}

impl From<config::ConfigError> for ListError {
    fn from(err: config::ConfigError) -> Self {
        ListError::Configuration(err.to_string())
    }
}

/// Failure of a primary list fetch, as reported to the controller.
#[derive(Debug, Clone, Error)]
#[error("List fetch failed: {cause}")]
pub struct FetchError {
    #[source]
    pub cause: ListError,
}

impl From<ListError> for FetchError {
    fn from(cause: ListError) -> Self {
        Self { cause }
    }
}

impl From<TransportFailure> for FetchError {
    fn from(failure: TransportFailure) -> Self {
        Self {
            cause: ListError::Transport(failure),
        }
    }
}

/// What the view is told when something went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    /// Original response payload (`null` when the failure never reached the server)
    pub payload: Value,
    /// Human-readable message, if the payload carried one
    pub message: Option<String>,
}

impl ErrorNotice {
    pub fn new(payload: Value, message: Option<String>) -> Self {
        Self { payload, message }
    }

    /// Message to display, falling back to `default` when the server gave none.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }
}
