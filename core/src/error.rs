//! Error types for the bounty API client.
//!
//! # Design
//! One enum carries every failure a caller can observe. Each variant holds
//! the payload specific to its kind (field name, status, retry-after,
//! wrapped cause), and `SwarmError::kind` gives a flat discriminant for
//! callers that only want to branch. Transport-level causes live in the
//! separate `TransportError` so custom transports can produce them without
//! depending on reqwest.

use std::time::Duration;

use thiserror::Error;

/// Default message for a 401 without a server-provided `error`.
pub const DEFAULT_AUTH_MESSAGE: &str = "Unauthorized";

/// Default message for a 429 without a server-provided `error`.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str =
    "API rate limit exceeded. Please try again in 15 minutes.";

/// Errors returned by `SwarmClient` operations.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// A required constructor or call argument was missing, or the request
    /// could not be built from the configuration (bad base URL, bad header
    /// value). Raised without retrying.
    #[error("{0}")]
    Config(String),

    /// A bounty creation field failed validation. Raised before any network
    /// attempt.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The server returned 401. Never retried.
    #[error("{message}")]
    Authentication { message: String },

    /// The server returned 429 on the last permitted attempt.
    #[error("{message}")]
    RateLimit { message: String, retry_after: u64 },

    /// The server returned any other non-2xx status. Never retried.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// Transport failures persisted through every attempt.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// A 2xx body was valid JSON but did not match the typed response.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Flat discriminant over `SwarmError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Validation,
    Authentication,
    RateLimit,
    Api,
    Network,
    Deserialization,
}

impl SwarmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwarmError::Config(_) => ErrorKind::Config,
            SwarmError::Validation { .. } => ErrorKind::Validation,
            SwarmError::Authentication { .. } => ErrorKind::Authentication,
            SwarmError::RateLimit { .. } => ErrorKind::RateLimit,
            SwarmError::Api { .. } => ErrorKind::Api,
            SwarmError::Network { .. } => ErrorKind::Network,
            SwarmError::Deserialization(_) => ErrorKind::Deserialization,
        }
    }

    /// Stable machine-readable code, for the kinds that have one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            SwarmError::Validation { .. } => Some("VALIDATION_ERROR"),
            SwarmError::Authentication { .. } => Some("AUTHENTICATION_ERROR"),
            SwarmError::RateLimit { .. } => Some("RATE_LIMIT_EXCEEDED"),
            SwarmError::Network { .. } => Some("NETWORK_ERROR"),
            _ => None,
        }
    }

    /// HTTP status associated with server-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            SwarmError::Authentication { .. } => Some(401),
            SwarmError::RateLimit { .. } => Some(429),
            SwarmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Offending field of a validation failure.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SwarmError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Seconds the server asked us to wait, for rate-limit failures.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            SwarmError::RateLimit { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SwarmError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Failure to obtain a usable response for a single attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response arrived within the per-attempt timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Generic transport failure reported by a custom `Transport`.
    #[error("request failed: {0}")]
    Request(String),

    /// The request could not be built (unparsable URL, invalid header
    /// value). Never retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// A 2xx response whose body could not be parsed as JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}
