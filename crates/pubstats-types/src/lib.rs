//! Wire contract shared by the publication statistics daemon and its clients.
//!
//! Every message crossing the socket is one of the serde types exported here.
//! Requests name a method and carry method-specific parameters; responses are
//! tagged by `status` so clients can tell a successful result from a typed
//! service failure or a protocol-level rejection.

mod error;
mod filter;
mod message;

pub use error::RpcError;
pub use filter::{Filter, FilterValue};
pub use message::{
    Aggregation, AggregationParams, QUERY_METHOD, QueryParams, RpcRequest, RpcResponse, RpcResult,
};
