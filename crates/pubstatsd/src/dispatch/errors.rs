//! Protocol-level failures raised before a request reaches the dispatcher.
//!
//! These never carry the service taxonomy; they are written back to the client
//! as `rejected` responses. Service failures travel as
//! [`RpcError`](pubstats_types::RpcError) instead.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading, parsing, or routing a request line.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line could not be parsed as a JSON request envelope.
    #[error("malformed JSONL: {message}")]
    MalformedJsonl {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request envelope is valid JSON but semantically incomplete.
    #[error("invalid request structure: {message}")]
    InvalidStructure { message: String },

    /// Method name is neither `query` nor a registered dimension.
    #[error("unknown method: {method}")]
    UnknownMethod { method: String },

    /// Params do not match the shape the method expects.
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[source] serde_json::Error),
}

impl DispatchError {
    /// Returns `true` when the connection cannot continue after this error.
    ///
    /// An oversized line leaves the stream mid-request and IO failures leave
    /// it unusable; every other error is answered and the next line is read.
    #[must_use]
    pub const fn closes_connection(&self) -> bool {
        matches!(
            self,
            Self::RequestTooLarge { .. } | Self::Io(_) | Self::SerializeResponse(_)
        )
    }

    /// Creates a malformed JSONL error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed JSONL error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid structure error.
    #[must_use]
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an unknown method error.
    #[must_use]
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }

    /// Creates an invalid params error.
    #[must_use]
    pub fn invalid_params(method: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidParams {
            method: method.into(),
            source,
        }
    }

    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }
}
