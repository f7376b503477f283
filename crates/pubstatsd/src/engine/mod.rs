//! Capability interface of the statistics backend.
//!
//! The dispatcher depends only on [`StatsEngine`]. Concrete backends decide
//! how counts are computed and how queries run; they report failures through
//! the two [`EngineError`] kinds, which the dispatcher maps onto the wire
//! taxonomy.

mod snapshot;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use pubstats_types::{Filter, RpcError};

use crate::registry::{Facet, Scope};

pub use snapshot::{SearchHits, SnapshotEngine, SnapshotError};

/// Facet counts in backend iteration order.
///
/// Keys are unique within one result; the backend guarantees it.
pub type Buckets = Vec<(String, u64)>;

/// Failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The request was semantically invalid for this backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The backend could not serve the request.
    #[error("operational failure: {0}")]
    OperationalFailure(String),
}

impl EngineError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an operational failure.
    #[must_use]
    pub fn operational(message: impl Into<String>) -> Self {
        Self::OperationalFailure(message.into())
    }

    /// Message supplied by the backend, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) | Self::OperationalFailure(message) => message,
        }
    }
}

impl From<EngineError> for RpcError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidInput(message) => Self::validation(message),
            EngineError::OperationalFailure(message) => Self::backend(message),
        }
    }
}

/// Aggregation and search backend.
///
/// Implementations are shared across connection threads and must tolerate
/// concurrent calls; the daemon adds no locking of its own.
pub trait StatsEngine: Send + Sync {
    /// Document returned by [`StatsEngine::search`].
    type Document: Serialize;

    /// Counts distinct `facet` values across `scope` records matching `filters`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when the filters or dimension are
    /// rejected, [`EngineError::OperationalFailure`] when the backend cannot
    /// serve the request.
    fn aggregate(
        &self,
        scope: Scope,
        facet: Facet,
        filters: Option<&Filter>,
    ) -> Result<Buckets, EngineError>;

    /// Runs a backend-defined query against one document type.
    ///
    /// # Errors
    ///
    /// Same kinds as [`StatsEngine::aggregate`].
    fn search(&self, document_type: &str, body: &Value) -> Result<Self::Document, EngineError>;
}

impl<T> StatsEngine for Arc<T>
where
    T: StatsEngine + ?Sized,
{
    type Document = T::Document;

    fn aggregate(
        &self,
        scope: Scope,
        facet: Facet,
        filters: Option<&Filter>,
    ) -> Result<Buckets, EngineError> {
        (**self).aggregate(scope, facet, filters)
    }

    fn search(&self, document_type: &str, body: &Value) -> Result<Self::Document, EngineError> {
        (**self).search(document_type, body)
    }
}
