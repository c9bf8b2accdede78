//! Error types for the request client.
//!
//! # Design
//! Transport and parse failures keep their original error as the source so
//! callers see exactly what the network layer or `serde_json` reported.
//! `Application` is the only variant produced by this crate's own logic: the
//! server answered with valid JSON that did not classify as success.

use thiserror::Error;

use crate::envelope::Envelope;

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never produced a response body (connection refused,
    /// DNS failure, broken pipe, ...).
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The server's envelope did not classify as success.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl RequestError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RequestError::Transport(err.into())
    }

    /// The envelope behind an application failure, if this is one.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            RequestError::Application(err) => Some(&err.data),
            _ => None,
        }
    }
}

/// A classified failure. `data` is the full envelope exactly as received.
///
/// Displays `message`, or `"request failed"` when the envelope carried no
/// usable message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct ApplicationError {
    pub message: Option<String>,
    pub data: Envelope,
}

impl ApplicationError {
    pub fn code(&self) -> Option<i64> {
        self.data.code()
    }
}

/// Returned by `StoreBinding::inject` when a handle is already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("store dispatch handle already injected")]
pub struct AlreadyInjected;
