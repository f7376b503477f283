//! Response serialization for the dispatch loop.

use std::io::Write;

use pubstats_types::RpcResponse;

use super::errors::DispatchError;

/// Writer that frames [`RpcResponse`] values as JSONL lines.
pub(crate) struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one response line and flushes, so the client can read it before
    /// sending its next request.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, writing, or flushing fails.
    pub(crate) fn write_response(&mut self, response: &RpcResponse) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, response)
            .map_err(DispatchError::SerializeResponse)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a protocol-level rejection describing `error`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub(crate) fn write_rejection(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_response(&RpcResponse::rejected(error.to_string()))
    }
}
