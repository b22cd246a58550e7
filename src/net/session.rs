//! The attached client.
//!
//! # Responsibilities
//! - Own the accepted socket until the client goes away
//! - Track how much of the welcome message this client has been sent
//! - Move single bytes in and out without blocking
//! - Generate unique session IDs for tracing

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::net::listener::is_transient;

/// Global atomic counter for session IDs.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sess-{}", self.0)
    }
}

/// Replay position within the welcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeCursor {
    /// Next byte to send is `welcome[offset]`.
    Pending(usize),
    /// Nothing (left) to replay for this session.
    Done,
}

impl WelcomeCursor {
    /// Cursor for a freshly accepted client.
    pub fn start(welcome: &[u8]) -> Self {
        if welcome.is_empty() {
            WelcomeCursor::Done
        } else {
            WelcomeCursor::Pending(0)
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, WelcomeCursor::Pending(_))
    }

    /// The welcome byte due next, if any.
    pub fn current(&self, welcome: &[u8]) -> Option<u8> {
        match *self {
            WelcomeCursor::Pending(offset) => welcome.get(offset).copied(),
            WelcomeCursor::Done => None,
        }
    }

    /// Step past the current byte, finishing after the last one.
    pub fn advance(&mut self, welcome: &[u8]) {
        if let WelcomeCursor::Pending(offset) = *self {
            let next = offset + 1;
            *self = if next < welcome.len() {
                WelcomeCursor::Pending(next)
            } else {
                WelcomeCursor::Done
            };
        }
    }
}

/// Result of a single-byte read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Byte(u8),
    /// Nothing buffered in the transport yet.
    NotReady,
    /// Orderly shutdown from the client.
    Closed,
}

/// One accepted client connection.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    stream: TcpStream,
    peer: SocketAddr,
    welcome: WelcomeCursor,
}

impl Session {
    /// Wrap an accepted, already non-blocking stream.
    pub fn new(stream: TcpStream, peer: SocketAddr, welcome: WelcomeCursor) -> Self {
        let id = SessionId::new();
        tracing::debug!(session_id = %id, peer_addr = %peer, "Session opened");
        Self {
            id,
            stream,
            peer,
            welcome,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn welcome(&self) -> WelcomeCursor {
        self.welcome
    }

    pub fn welcome_mut(&mut self) -> &mut WelcomeCursor {
        &mut self.welcome
    }

    /// Try to write one byte.
    ///
    /// `Ok(false)` means the socket cannot take it right now; the byte was
    /// not sent and should be offered again next tick.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<bool> {
        match self.stream.write(&[byte]) {
            Ok(1) => Ok(true),
            Ok(_) => Err(io::Error::from(io::ErrorKind::WriteZero)),
            Err(e) if is_transient(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Try to read one byte.
    pub fn read_byte(&mut self) -> io::Result<ReadOutcome> {
        let mut byte = [0u8; 1];
        match self.stream.read(&mut byte) {
            Ok(0) => Ok(ReadOutcome::Closed),
            Ok(_) => Ok(ReadOutcome::Byte(byte[0])),
            Err(e) if is_transient(&e) => Ok(ReadOutcome::NotReady),
            Err(e) => Err(e),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!(session_id = %self.id, "Session closed");
    }
}
