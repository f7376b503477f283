//! Forwarding of typed calls to the statistics engine.

use std::sync::Arc;

use serde_json::Value;

use pubstats_types::{Aggregation, Filter, RpcError};

use crate::engine::{EngineError, StatsEngine};
use crate::registry::Dimension;

use super::reporter::DispatchReporter;

/// Forwards calls to a [`StatsEngine`] and shapes its answers for the wire.
///
/// The dispatcher keeps no per-request state and adds no locking, so a single
/// instance is shared by every connection thread. The per-dimension entry
/// points (`journal_statuses`, `document_languages`, ...) are generated by the
/// registry and all delegate to [`Dispatcher::forward`].
pub struct Dispatcher<E> {
    engine: E,
    reporter: Arc<dyn DispatchReporter>,
}

impl<E> Dispatcher<E> {
    /// Creates a dispatcher over `engine`, logging through `reporter`.
    #[must_use]
    pub const fn new(engine: E, reporter: Arc<dyn DispatchReporter>) -> Self {
        Self { engine, reporter }
    }

    /// The engine calls are forwarded to.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: StatsEngine> Dispatcher<E> {
    /// Aggregates one dimension and converts the buckets to wire form.
    ///
    /// Bucket order is the engine's; nothing is deduplicated or re-sorted.
    ///
    /// # Errors
    ///
    /// Rejected input is reported and returned as
    /// [`RpcError::ValidationError`]. Operational failures are returned as
    /// [`RpcError::BackendError`] without being reported.
    pub fn forward(
        &self,
        dimension: Dimension,
        filters: Option<&Filter>,
    ) -> Result<Vec<Aggregation>, RpcError> {
        let buckets = self
            .engine
            .aggregate(dimension.scope, dimension.facet, filters)
            .map_err(|error| {
                if let EngineError::InvalidInput(message) = &error {
                    self.reporter.aggregation_rejected(dimension, message);
                }
                RpcError::from(error)
            })?;

        Ok(buckets
            .into_iter()
            .map(|(key, count)| Aggregation { key, count })
            .collect())
    }

    /// Runs a free-text query and returns the result document as JSON text.
    ///
    /// # Errors
    ///
    /// As for [`Dispatcher::forward`]. A document that cannot be serialised
    /// is also reported and returned as [`RpcError::ValidationError`], even
    /// though the engine call itself succeeded.
    pub fn query(&self, document_type: &str, body: &Value) -> Result<String, RpcError> {
        let document = self
            .engine
            .search(document_type, body)
            .map_err(|error| {
                if let EngineError::InvalidInput(message) = &error {
                    self.reporter.query_rejected(document_type, message);
                }
                RpcError::from(error)
            })?;

        serde_json::to_string(&document).map_err(|error| {
            self.reporter.result_unserialisable(document_type, &error);
            RpcError::validation(error.to_string())
        })
    }
}
