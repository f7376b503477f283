//! Request line parsing.

use serde::de::DeserializeOwned;
use serde_json::Value;

use pubstats_types::RpcRequest;

use super::errors::DispatchError;

/// Parses one JSONL line into a request envelope.
///
/// Trailing whitespace, including the newline delimiter, is ignored. The
/// method name is trimmed.
///
/// # Errors
///
/// Returns [`DispatchError::MalformedJsonl`] for empty or non-JSON lines and
/// [`DispatchError::InvalidStructure`] when the method name is blank.
pub(crate) fn parse_request(line: &[u8]) -> Result<RpcRequest, DispatchError> {
    let trimmed = line.trim_ascii_end();
    if trimmed.is_empty() {
        return Err(DispatchError::malformed("empty request line"));
    }

    let mut request: RpcRequest =
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)?;
    let method = request.method.trim().to_owned();
    if method.is_empty() {
        return Err(DispatchError::invalid_structure("method field is empty"));
    }
    request.method = method;
    Ok(request)
}

/// Decodes method params, treating absent params as an empty object.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidParams`] when the params do not match `T`.
pub(crate) fn decode_params<T: DeserializeOwned>(
    method: &str,
    params: &Value,
) -> Result<T, DispatchError> {
    let raw = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(raw).map_err(|source| DispatchError::invalid_params(method, source))
}
