//! Shared helpers for bridge integration tests.

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::{SocketAddrV4, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing_subscriber::fmt::MakeWriter;
use uart_bridge::{LinkState, UartBridge, UartConfig};

pub const DEADLINE: Duration = Duration::from_secs(5);

/// Small-buffer loopback config on `port`.
pub fn config(port: u16) -> UartConfig {
    UartConfig {
        port,
        loopback_only: true,
        tx_buffer_size: 16,
        rx_buffer_size: 16,
        welcome_message: None,
        diagnostics: true,
        diagnostics_prefix: "test-uart: ".into(),
    }
}

/// Connect a non-blocking client to the bridge's listen address.
pub fn connect(bridge: &UartBridge) -> TcpStream {
    let stream = TcpStream::connect(bridge.listen_addr()).expect("connect to bridge");
    stream.set_nonblocking(true).unwrap();
    stream
}

/// Tick until `done` holds. Panics after `DEADLINE`.
pub fn tick_until(bridge: &mut UartBridge, mut done: impl FnMut(&mut UartBridge) -> bool) {
    let start = Instant::now();
    loop {
        bridge.tick();
        if done(bridge) {
            return;
        }
        assert!(start.elapsed() < DEADLINE, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Tick until the bridge has attached a client.
pub fn wait_connected(bridge: &mut UartBridge) {
    tick_until(bridge, |b| b.is_connected());
}

/// Tick until the bridge is back to waiting for a client.
pub fn wait_listening(bridge: &mut UartBridge) {
    tick_until(bridge, |b| b.state() == LinkState::Listening);
}

/// Tick the bridge while collecting `n` bytes on the client side.
pub fn read_from_bridge(bridge: &mut UartBridge, client: &mut TcpStream, n: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 64];
    tick_until(bridge, |_| {
        loop {
            match client.read(&mut chunk) {
                Ok(0) => break,
                Ok(k) => out.extend_from_slice(&chunk[..k]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => panic!("client read failed: {e}"),
            }
        }
        out.len() >= n
    });
    out
}

/// Write everything to a non-blocking client socket.
pub fn write_to_bridge(client: &mut TcpStream, bytes: &[u8]) {
    let start = Instant::now();
    let mut rest = bytes;
    while !rest.is_empty() {
        match client.write(rest) {
            Ok(k) => rest = &rest[k..],
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                assert!(start.elapsed() < DEADLINE, "client write stalled");
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(e) => panic!("client write failed: {e}"),
        }
    }
}

/// Hold `addr` with a plain listener so the bridge cannot bind it.
pub fn occupy(addr: SocketAddrV4) -> TcpListener {
    let start = Instant::now();
    loop {
        match TcpListener::bind(addr) {
            Ok(listener) => return listener,
            Err(e) => {
                assert!(start.elapsed() < DEADLINE, "could not occupy {addr}: {e}");
                std::thread::sleep(Duration::from_millis(1));
            }
        }
    }
}

/// Drain the bridge's receive buffer.
pub fn drain(bridge: &mut UartBridge) -> Vec<u8> {
    std::iter::from_fn(|| bridge.receive_byte().ok()).collect()
}

/// In-memory log sink for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }

    /// Run `f` with this capture installed as the thread's subscriber.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
