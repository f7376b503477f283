//! Request and response envelopes for the JSONL protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Filter, RpcError};

/// Method name of the free-text query operation.
pub const QUERY_METHOD: &str = "query";

/// One request line sent by a client.
///
/// ```json
/// {"method":"journal_statuses","params":{"filters":{"collection":"scl"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Operation to invoke.
    pub method: String,
    /// Method-specific parameters; `null` when omitted.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl RpcRequest {
    /// Builds a request for one of the aggregation operations.
    #[must_use]
    pub fn aggregation(method: impl Into<String>, filters: Option<Filter>) -> Self {
        let params = match filters {
            Some(filters) => serde_json::json!({ "filters": filters }),
            None => Value::Null,
        };
        Self {
            method: method.into(),
            params,
        }
    }

    /// Builds a free-text query request.
    #[must_use]
    pub fn query(document_type: impl Into<String>, body: Value) -> Self {
        Self {
            method: QUERY_METHOD.to_owned(),
            params: serde_json::json!({
                "document_type": document_type.into(),
                "body": body,
            }),
        }
    }
}

/// Parameters accepted by every aggregation operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationParams {
    /// Optional constraints narrowing the aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filter>,
}

/// Parameters of the `query` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParams {
    /// Document category searched, for example `journal` or `article`.
    pub document_type: String,
    /// Backend-defined query payload.
    #[serde(default)]
    pub body: Value,
}

/// One bucket of an aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Facet value.
    pub key: String,
    /// Number of records carrying the value.
    pub count: u64,
}

impl Aggregation {
    /// Creates a bucket.
    #[must_use]
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Successful result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcResult {
    /// Buckets returned by an aggregation operation, in backend order.
    Aggregations(Vec<Aggregation>),
    /// JSON text returned by `query`.
    Document(String),
}

/// One response line written by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RpcResponse {
    /// The call succeeded.
    Ok {
        /// Result payload.
        result: RpcResult,
    },
    /// The call reached the service and failed with a typed error.
    Failed {
        /// Service error.
        error: RpcError,
    },
    /// The request was refused before reaching the service.
    Rejected {
        /// Why the request was refused.
        message: String,
    },
}

impl RpcResponse {
    /// Wraps a service outcome.
    #[must_use]
    pub fn from_outcome(outcome: Result<RpcResult, RpcError>) -> Self {
        match outcome {
            Ok(result) => Self::Ok { result },
            Err(error) => Self::Failed { error },
        }
    }

    /// Creates a protocol-level rejection.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterValue;

    #[test]
    fn aggregation_request_without_filters_omits_params() {
        let request = RpcRequest::aggregation("journal_statuses", None);
        let json = serde_json::to_string(&request).expect("serialise request");
        assert_eq!(json, r#"{"method":"journal_statuses"}"#);
    }

    #[test]
    fn aggregation_request_carries_filters() {
        let filters = Filter::from([("collection".to_owned(), FilterValue::from("scl"))]);
        let request = RpcRequest::aggregation("document_languages", Some(filters.clone()));
        let params: AggregationParams =
            serde_json::from_value(request.params).expect("decode params");
        assert_eq!(params.filters, Some(filters));
    }

    #[test]
    fn query_request_decodes_into_query_params() {
        let body = serde_json::json!({"q": "covid", "size": 5});
        let request = RpcRequest::query("article", body.clone());
        assert_eq!(request.method, QUERY_METHOD);

        let params: QueryParams = serde_json::from_value(request.params).expect("decode params");
        assert_eq!(
            params,
            QueryParams {
                document_type: "article".to_owned(),
                body,
            }
        );
    }

    #[test]
    fn query_params_reject_unknown_fields() {
        let result = serde_json::from_str::<QueryParams>(
            r#"{"document_type":"article","body":{},"size":3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn ok_response_wraps_aggregations() {
        let response = RpcResponse::Ok {
            result: RpcResult::Aggregations(vec![Aggregation::new("A", 3)]),
        };
        let json = serde_json::to_string(&response).expect("serialise response");
        assert_eq!(json, r#"{"status":"ok","result":[{"key":"A","count":3}]}"#);
    }

    #[test]
    fn failed_response_decodes_back_to_the_error() {
        let line = r#"{"status":"failed","error":{"kind":"BackendError","message":"index unavailable"}}"#;
        let response: RpcResponse = serde_json::from_str(line).expect("decode response");
        assert_eq!(
            response,
            RpcResponse::Failed {
                error: RpcError::backend("index unavailable"),
            }
        );
    }

    #[test]
    fn document_result_decodes_as_text() {
        let line = r#"{"status":"ok","result":"{\"total\":0}"}"#;
        let response: RpcResponse = serde_json::from_str(line).expect("decode response");
        assert_eq!(
            response,
            RpcResponse::Ok {
                result: RpcResult::Document(r#"{"total":0}"#.to_owned()),
            }
        );
    }
}
