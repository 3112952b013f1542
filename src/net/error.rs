//! Structured failure type shared by every remote call.
//!
//! ERROR HANDLING
//! ==============
//! The HTTP collaborator never panics and never returns raw transport errors:
//! each failure is folded into an [`ApiError`] whose `status` carries the
//! transport convention (`0` network, `408` timeout) or the backend's HTTP
//! status. State modules copy `message` into their `error` field and also
//! return the error to the caller.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

/// Status used when no response was received.
pub const NETWORK_STATUS: u16 = 0;
/// Status used when the transport timed out.
pub const TIMEOUT_STATUS: u16 = 408;

/// Failure reported by the HTTP collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    /// Per-field messages when the backend rejects a payload.
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Coarse classification used by call sites that want kind-specific handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Timeout,
    Authentication,
    Server,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { message: message.into(), status, errors: None }
    }

    #[must_use]
    pub fn network() -> Self {
        Self::new(NETWORK_STATUS, "Network error occurred")
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::new(TIMEOUT_STATUS, "Request timeout")
    }

    #[must_use]
    pub fn invalid_response(status: u16) -> Self {
        Self::new(status, "Invalid response format")
    }

    /// A request rejected before it reached the transport.
    pub fn client(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// Build from a non-2xx JSON body of shape `{ message?, errors? }`.
    #[must_use]
    pub fn from_body(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("An error occurred")
            .to_owned();
        let errors = body
            .get("errors")
            .and_then(|v| serde_json::from_value::<BTreeMap<String, Vec<String>>>(v.clone()).ok());
        Self { message, status, errors }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.status {
            NETWORK_STATUS => ErrorKind::Network,
            TIMEOUT_STATUS => ErrorKind::Timeout,
            401 | 403 => ErrorKind::Authentication,
            _ => ErrorKind::Server,
        }
    }

    /// Message to show, falling back when the backend sent an empty one.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.trim().is_empty() { fallback } else { &self.message }
    }
}
