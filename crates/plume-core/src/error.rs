//! Error types shared by the Plume crates.
//!
//! Framework-level errors (plugin installation) live in `plume-framework`,
//! configuration and runtime errors in `plume-runtime`.

use thiserror::Error;

// =============================================================================
// Event Errors
// =============================================================================

/// Errors raised while turning a host payload into an [`Event`](crate::Event).
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// The payload is not valid JSON or does not fit the event shape.
    #[error("failed to parse event: {reason}")]
    Parse {
        /// Reason for failure.
        reason: String,
    },

    /// The payload belongs to a category handlers cannot subscribe to
    /// (e.g. `meta_event`).
    #[error("unsupported post_type '{post_type}'")]
    Unsupported {
        /// The `post_type` found in the payload.
        post_type: String,
    },
}

impl EventError {
    /// Creates a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse { reason: msg.into() }
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for calls made through the host [`Api`](crate::Api).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The host has no live connection to the chat service.
    #[error("host is not connected")]
    NotConnected,

    /// The host executed the action and reported a failure.
    #[error("API error ({retcode}): {message}")]
    Failed { retcode: i64, message: String },

    /// Failed to serialize/deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The event carries no conversation an action could be sent to.
    #[error("event has no {0} to address")]
    MissingTarget(&'static str),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for event parsing.
pub type EventResult<T> = Result<T, EventError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
