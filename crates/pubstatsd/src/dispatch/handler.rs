//! Connection handler that answers JSONL requests.
//!
//! Implements the transport's [`ConnectionHandler`]: each request line is
//! parsed, routed, and answered with exactly one response line, in order, until
//! the client closes the connection.

use std::io::{self, BufRead, BufReader, Read};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::StatsEngine;
use crate::transport::ConnectionHandler;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::parse_request;
use super::response::ResponseWriter;
use super::router::Router;

/// Maximum size of a single request line in bytes, newline included.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Upper bound on input discarded after an oversized line before closing.
const DRAIN_LIMIT_BYTES: u64 = 16 * 1024 * 1024;

/// How long a closing connection waits for the client to stop sending.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection handler that parses and dispatches JSONL requests.
pub(crate) struct DispatchConnectionHandler<E> {
    router: Router<E>,
}

impl<E: StatsEngine> DispatchConnectionHandler<E> {
    pub(crate) fn new(router: Router<E>) -> Self {
        Self { router }
    }

    fn serve(&self, stream: TcpStream) -> Result<(), DispatchError> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = ResponseWriter::new(stream);

        loop {
            let outcome = match read_request_line(&mut reader) {
                Ok(None) => return Ok(()),
                Ok(Some(line)) => {
                    parse_request(&line).and_then(|request| self.router.route(&request))
                }
                Err(error) => Err(error),
            };

            match outcome {
                Ok(response) => writer.write_response(&response)?,
                Err(error) => {
                    warn!(target: DISPATCH_TARGET, %error, "request rejected");
                    writer.write_rejection(&error)?;
                    if error.closes_connection() {
                        if let Err(drain_error) = close_after_rejection(&mut reader) {
                            debug!(target: DISPATCH_TARGET, %drain_error, "drain failed");
                        }
                        return Err(error);
                    }
                }
            }
        }
    }
}

impl<E: StatsEngine + 'static> ConnectionHandler for DispatchConnectionHandler<E> {
    fn handle(&self, stream: TcpStream) {
        let peer = stream.peer_addr().ok();
        match self.serve(stream) {
            Ok(()) => debug!(target: DISPATCH_TARGET, ?peer, "client disconnected"),
            Err(error) => debug!(target: DISPATCH_TARGET, ?peer, %error, "connection closed"),
        }
    }
}

/// Half-closes the stream and discards unread input so the rejection line is
/// delivered before the socket is dropped.
///
/// Closing a socket with unread input makes the kernel reset the connection,
/// which discards the response still queued for the client.
fn close_after_rejection(reader: &mut BufReader<TcpStream>) -> io::Result<u64> {
    let stream = reader.get_ref();
    stream.shutdown(Shutdown::Write)?;
    stream.set_read_timeout(Some(DRAIN_TIMEOUT))?;
    io::copy(&mut reader.by_ref().take(DRAIN_LIMIT_BYTES), &mut io::sink())
}

/// Reads one newline-terminated request line of at most [`MAX_REQUEST_BYTES`].
///
/// Returns `Ok(None)` once the client has closed the connection. A final line
/// without a trailing newline is still returned.
fn read_request_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let limit = u64::try_from(MAX_REQUEST_BYTES).map_or(u64::MAX, |max| max.saturating_add(1));
    let read = reader.by_ref().take(limit).read_until(b'\n', &mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    if buffer.len() > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(buffer.len(), MAX_REQUEST_BYTES));
    }
    Ok(Some(buffer))
}
