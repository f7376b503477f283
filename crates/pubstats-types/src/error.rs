//! Service error taxonomy visible to clients.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed failure of a service call.
///
/// The `kind` tag tells the caller whether the request itself was at fault
/// (`ValidationError`) or the service failed while handling it
/// (`BackendError`). The message is the backend's text, passed through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind")]
pub enum RpcError {
    /// The request, or the result the backend produced for it, was invalid.
    #[error("{message}")]
    ValidationError {
        /// Human-readable description.
        message: String,
    },
    /// The backend failed for operational reasons.
    #[error("{message}")]
    BackendError {
        /// Human-readable description.
        message: String,
    },
}

impl RpcError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendError {
            message: message.into(),
        }
    }

    /// Returns the message carried by either kind.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message } | Self::BackendError { message } => message,
        }
    }

    /// Returns `true` when repeating the same call could succeed.
    ///
    /// A rejected request fails the same way every time, so only backend
    /// failures are worth retrying. Retry policy itself belongs to the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendError { .. })
    }
}
