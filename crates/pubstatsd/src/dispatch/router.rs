//! Method routing for dispatch.
//!
//! `query` is routed explicitly; every other method name is resolved through
//! the dimension registry. Unknown methods are rejected before the dispatcher
//! is reached.

use std::sync::Arc;

use tracing::debug;

use pubstats_types::{AggregationParams, QUERY_METHOD, QueryParams, RpcRequest, RpcResponse, RpcResult};

use crate::engine::StatsEngine;
use crate::registry;

use super::DISPATCH_TARGET;
use super::dispatcher::Dispatcher;
use super::errors::DispatchError;
use super::request::decode_params;

/// Routes parsed requests to the dispatcher.
pub struct Router<E> {
    dispatcher: Arc<Dispatcher<E>>,
}

impl<E> Clone for Router<E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<E: StatsEngine> Router<E> {
    /// Creates a router over a shared dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Arc<Dispatcher<E>>) -> Self {
        Self { dispatcher }
    }

    /// Routes a request and wraps the service outcome as a response.
    ///
    /// Service failures are part of the returned response; only protocol
    /// problems are returned as errors.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownMethod`] for unregistered methods and
    /// [`DispatchError::InvalidParams`] when params do not fit the method.
    pub fn route(&self, request: &RpcRequest) -> Result<RpcResponse, DispatchError> {
        let method = request.method.as_str();
        debug!(target: DISPATCH_TARGET, method, "routing request");

        let outcome = if method == QUERY_METHOD {
            let params: QueryParams = decode_params(method, &request.params)?;
            self.dispatcher
                .query(&params.document_type, &params.body)
                .map(RpcResult::Document)
        } else if let Some(dimension) = registry::lookup(method) {
            let params: AggregationParams = decode_params(method, &request.params)?;
            self.dispatcher
                .forward(dimension, params.filters.as_ref())
                .map(RpcResult::Aggregations)
        } else {
            return Err(DispatchError::unknown_method(method));
        };

        Ok(RpcResponse::from_outcome(outcome))
    }
}
