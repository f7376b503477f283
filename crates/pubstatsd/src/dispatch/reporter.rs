//! Logging handle owned by the dispatcher.

use tracing::error;

use crate::registry::Dimension;

use super::DISPATCH_TARGET;

/// Observer receiving the events the dispatcher logs.
///
/// Only rejected input and unserialisable results are reported. Operational
/// backend failures are returned to the caller without being reported here.
pub trait DispatchReporter: Send + Sync {
    /// The engine rejected an aggregation request.
    fn aggregation_rejected(&self, dimension: Dimension, message: &str);

    /// The engine rejected a query.
    fn query_rejected(&self, document_type: &str, message: &str);

    /// The engine answered a query with a document that is not valid JSON.
    fn result_unserialisable(&self, document_type: &str, error: &serde_json::Error);
}

/// Default reporter that records events using `tracing` at error severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredDispatchReporter;

impl DispatchReporter for StructuredDispatchReporter {
    fn aggregation_rejected(&self, dimension: Dimension, message: &str) {
        error!(
            target: DISPATCH_TARGET,
            event = "aggregation_rejected",
            %dimension,
            "{message}"
        );
    }

    fn query_rejected(&self, document_type: &str, message: &str) {
        error!(
            target: DISPATCH_TARGET,
            event = "query_rejected",
            document_type,
            "{message}"
        );
    }

    fn result_unserialisable(&self, document_type: &str, error: &serde_json::Error) {
        error!(
            target: DISPATCH_TARGET,
            event = "result_unserialisable",
            document_type,
            %error,
            "invalid JSON data"
        );
    }
}
