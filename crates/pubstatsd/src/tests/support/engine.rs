//! Scripted [`StatsEngine`] that records the calls it receives.

use std::sync::Mutex;

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

use pubstats_types::Filter;

use crate::engine::{Buckets, EngineError, StatsEngine};
use crate::registry::{Facet, Scope};

/// Recorded aggregation call.
pub type AggregateCall = (Scope, Facet, Option<Filter>);

/// Engine answering every call with the same scripted outcome.
pub struct StaticEngine<D = Value> {
    buckets: Buckets,
    document: D,
    failure: Option<EngineError>,
    aggregate_calls: Mutex<Vec<AggregateCall>>,
    search_calls: Mutex<Vec<(String, Value)>>,
}

impl StaticEngine<Value> {
    /// Answers aggregations with `buckets` and queries with an empty object.
    pub fn with_buckets(buckets: Buckets) -> Self {
        Self::scripted(buckets, Value::Object(Map::new()), None)
    }

    /// Fails every call with `failure`.
    pub fn failing(failure: EngineError) -> Self {
        Self::scripted(Vec::new(), Value::Null, Some(failure))
    }
}

impl<D> StaticEngine<D> {
    /// Answers queries with `document` and aggregations with no buckets.
    pub fn with_document(document: D) -> Self {
        Self::scripted(Vec::new(), document, None)
    }

    fn scripted(buckets: Buckets, document: D, failure: Option<EngineError>) -> Self {
        Self {
            buckets,
            document,
            failure,
            aggregate_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    /// Aggregation calls received so far.
    pub fn aggregate_calls(&self) -> Vec<AggregateCall> {
        self.aggregate_calls
            .lock()
            .expect("aggregate call log poisoned")
            .clone()
    }

    /// Query calls received so far.
    pub fn search_calls(&self) -> Vec<(String, Value)> {
        self.search_calls
            .lock()
            .expect("search call log poisoned")
            .clone()
    }

    fn outcome<T>(&self, success: impl FnOnce() -> T) -> Result<T, EngineError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(success()),
        }
    }
}

impl<D> StatsEngine for StaticEngine<D>
where
    D: Serialize + Clone + Send + Sync,
{
    type Document = D;

    fn aggregate(
        &self,
        scope: Scope,
        facet: Facet,
        filters: Option<&Filter>,
    ) -> Result<Buckets, EngineError> {
        self.aggregate_calls
            .lock()
            .expect("aggregate call log poisoned")
            .push((scope, facet, filters.cloned()));
        self.outcome(|| self.buckets.clone())
    }

    fn search(&self, document_type: &str, body: &Value) -> Result<D, EngineError> {
        self.search_calls
            .lock()
            .expect("search call log poisoned")
            .push((document_type.to_owned(), body.clone()));
        self.outcome(|| self.document.clone())
    }
}

/// Document whose serialisation always fails.
#[derive(Debug, Clone, Copy)]
pub struct UnserialisableDocument;

impl Serialize for UnserialisableDocument {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("document is not serialisable"))
    }
}
