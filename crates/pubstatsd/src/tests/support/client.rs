//! Minimal JSONL client for exercising a live listener.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use serde_json::Value;

/// Sends `requests` on one connection and returns every response line.
///
/// The write half is closed after the last request so the server finishes the
/// connection once it has answered.
pub fn exchange(address: SocketAddr, requests: &[&str]) -> Vec<Value> {
    let mut stream = TcpStream::connect(address).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("set read timeout");
    for request in requests {
        stream.write_all(request.as_bytes()).expect("write request");
        stream.write_all(b"\n").expect("write newline");
    }
    stream.flush().expect("flush");
    stream.shutdown(Shutdown::Write).expect("close write half");

    BufReader::new(stream)
        .lines()
        .map(|line| serde_json::from_str(&line.expect("read response")).expect("response json"))
        .collect()
}
