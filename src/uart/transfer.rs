//! Per-tick byte transfer between the ring buffers and the client socket.
//!
//! # Responsibilities
//! - Drain the welcome message, then the transmit buffer, while the socket
//!   accepts data
//! - Fill the receive buffer while it has room and the socket has data
//!
//! # Design Decisions
//! - One byte per syscall; throughput is bounded by the tick rate anyway
//! - A byte leaves the transmit side only once the socket took it
//! - A full receive buffer stops reading altogether, so unread bytes stay in
//!   the kernel's socket buffer and TCP flow control pushes back on the client

use crate::buffer::RingBuffer;
use crate::net::{ReadOutcome, Session};
use crate::observability::metrics;
use crate::uart::error::SessionError;

/// How the receive step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Session still open; carries the number of bytes stored this tick.
    Open(usize),
    /// The client closed its end.
    PeerClosed,
}

/// Send pending welcome bytes, then buffered transmit bytes.
///
/// Returns the number of bytes written. Stops early once the socket would
/// block.
pub fn transmit(
    session: &mut Session,
    tx: &mut RingBuffer,
    welcome: &[u8],
) -> Result<usize, SessionError> {
    let mut sent = 0;

    loop {
        let (byte, from_welcome) = match session.welcome().current(welcome) {
            Some(b) => (b, true),
            None => match tx.peek() {
                Some(b) => (b, false),
                None => break,
            },
        };

        if !session.write_byte(byte).map_err(SessionError::Send)? {
            break;
        }

        if from_welcome {
            session.welcome_mut().advance(welcome);
        } else {
            tx.pop();
        }
        metrics::record_byte_sent();
        sent += 1;
    }

    Ok(sent)
}

/// Read from the client into `rx` until it is full or the socket runs dry.
pub fn receive(session: &mut Session, rx: &mut RingBuffer) -> Result<ReceiveOutcome, SessionError> {
    let mut stored = 0;

    while !rx.is_full() {
        match session.read_byte().map_err(SessionError::Receive)? {
            ReadOutcome::Byte(b) => {
                rx.push(b);
                metrics::record_byte_received();
                stored += 1;
            }
            ReadOutcome::NotReady => break,
            ReadOutcome::Closed => return Ok(ReceiveOutcome::PeerClosed),
        }
    }

    Ok(ReceiveOutcome::Open(stored))
}
