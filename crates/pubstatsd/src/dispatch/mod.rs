//! JSONL request dispatch for the statistics service.
//!
//! Each connection carries a sequence of request lines. Every line is parsed
//! into an [`RpcRequest`](pubstats_types::RpcRequest), routed by method name to
//! the [`Dispatcher`], and answered with exactly one
//! [`RpcResponse`](pubstats_types::RpcResponse) line:
//!
//! ```json
//! {"method":"document_languages","params":{"filters":{"collection":"scl"}}}
//! {"status":"ok","result":[{"key":"pt","count":2},{"key":"en","count":1}]}
//! ```
//!
//! Service failures come back as `failed` responses carrying the two-kind
//! error taxonomy. Requests that never reach the dispatcher (bad JSON, unknown
//! method, malformed params) come back as `rejected`.

mod dispatcher;
mod errors;
mod handler;
mod reporter;
mod request;
mod response;
mod router;

pub use self::dispatcher::Dispatcher;
pub use self::errors::DispatchError;
pub(crate) use self::handler::DispatchConnectionHandler;
pub use self::reporter::{DispatchReporter, StructuredDispatchReporter};
pub use self::router::Router;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
