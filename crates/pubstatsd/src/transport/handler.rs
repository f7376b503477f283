//! Connection handling abstraction for the daemon listener.

use std::net::TcpStream;

/// Handles accepted TCP connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection until the client disconnects.
    /// Implementations should avoid panicking.
    fn handle(&self, stream: TcpStream);
}
