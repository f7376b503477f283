//! Tests for the socket listener.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use super::{ConnectionHandler, CountingHandler, EchoHandler, ListenerError, SocketListener};

#[derive(Clone)]
struct CountingFixture {
    count: Arc<AtomicUsize>,
    handler: Arc<CountingHandler>,
}

#[fixture]
fn counting_fixture() -> CountingFixture {
    let (count, handler) = CountingHandler::new();
    CountingFixture { count, handler }
}

#[fixture]
fn listener() -> SocketListener {
    SocketListener::bind("127.0.0.1", 0).expect("bind tcp listener")
}

fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[rstest]
fn binding_port_zero_reports_assigned_port(listener: SocketListener) {
    assert_ne!(listener.local_addr().port(), 0);
}

#[rstest]
fn tcp_listener_accepts_connections(listener: SocketListener, counting_fixture: CountingFixture) {
    let addr = listener.local_addr();
    let CountingFixture { count, handler } = counting_fixture;
    let handler: Arc<dyn ConnectionHandler> = handler;
    let handle = listener.start(handler).expect("start listener");

    TcpStream::connect(addr).expect("connect first client");
    TcpStream::connect(addr).expect("connect second client");

    assert!(wait_for_count(&count, 2), "expected two connections");
    handle.shutdown();
    handle.join().expect("join listener");
}

#[rstest]
fn connections_are_served_concurrently(listener: SocketListener) {
    let handle = listener.start(Arc::new(EchoHandler)).expect("start listener");
    let addr = handle.local_addr();

    let mut first = TcpStream::connect(addr).expect("connect first client");
    let mut second = TcpStream::connect(addr).expect("connect second client");
    second.write_all(b"second\n").expect("write second");
    first.write_all(b"first\n").expect("write first");

    let mut line = String::new();
    BufReader::new(&mut second)
        .read_line(&mut line)
        .expect("read second");
    assert_eq!(line, "second\n");
    line.clear();
    BufReader::new(&mut first)
        .read_line(&mut line)
        .expect("read first");
    assert_eq!(line, "first\n");

    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn bind_fails_when_port_is_taken() {
    let occupied = TcpListener::bind(("127.0.0.1", 0)).expect("bind occupying listener");
    let port = occupied.local_addr().expect("occupied address").port();

    let error = SocketListener::bind("127.0.0.1", port).expect_err("port should be taken");
    assert!(matches!(error, ListenerError::BindTcp { .. }), "{error:?}");
}

#[test]
fn bind_fails_for_unresolvable_host() {
    let error = SocketListener::bind("host.invalid", 0).expect_err("host should not resolve");
    assert!(
        matches!(
            error,
            ListenerError::Resolve { .. } | ListenerError::ResolveEmpty { .. }
        ),
        "{error:?}"
    );
}
