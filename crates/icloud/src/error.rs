//! Error types for the icloud library.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, signing, transport, API, and decoding failures.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ErrorCode, duration};

/// The unified error type for icloud operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or caller input, detected before dispatch.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The request could not be signed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// Network transport errors (DNS, TLS, connection, redirects), unwrapped.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status of 400 or above.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A success response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A success response contained fields unknown to the target type.
    #[error("unknown fields in response: {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    /// Copying a response body into a caller-provided sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the structured API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Configuration and input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// The base URL derived from container and environment is not valid.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A header value contains characters that cannot be sent.
    #[error("invalid value for header {name}")]
    Header { name: &'static str },

    /// A records request exceeds the per-request operation limit.
    #[error("{count} operations exceed the limit of {max} per request")]
    TooManyOperations { count: usize, max: usize },
}

/// Errors raised while producing the request signature.
#[derive(Debug, Error)]
pub enum SigningError {
    /// No private key is configured on the client.
    #[error("no private key configured")]
    MissingKey,

    /// The ECDSA signing operation failed (for example, entropy exhaustion).
    #[error("ECDSA signing failed: {0}")]
    Ecdsa(#[from] p256::ecdsa::Error),
}

/// The structured error returned on responses with a status of 400 or above.
///
/// Serializes to and from the server shape
/// `{"reason": "...", "retryAfter": "30s", "serverErrorCode": "THROTTLED"}`.
/// Missing fields default to an empty reason, no retry hint, and
/// [`ErrorCode::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Reason for the error.
    #[serde(default)]
    pub reason: String,

    /// Suggested wait before retrying. `None` means no hint was given.
    #[serde(default, with = "duration::option", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<Duration>,

    /// Server error code.
    #[serde(default, rename = "serverErrorCode")]
    pub code: ErrorCode,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(reason: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            reason: reason.into(),
            retry_after: None,
            code,
        }
    }

    /// Attach a retry hint.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Whether the server signalled that repeating the request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::Throttled | ErrorCode::TryAgainLater)
            || self.retry_after.is_some_and(|d| !d.is_zero())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error: {}", self.reason)?;
        match self.retry_after {
            Some(after) if !after.is_zero() => write!(f, ", retry after {after:?}"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}
