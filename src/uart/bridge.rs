//! The emulated UART: buffers, link state and the per-tick step.
//!
//! # Responsibilities
//! - Own both ring buffers and whichever socket is currently live
//! - Offer the producer/consumer side (`send_byte`, `receive_byte`)
//! - Advance the link by one step per `tick`
//!
//! # Design Decisions
//! - Listener and session are variants of one enum, so they cannot coexist
//! - `tick` never fails: session problems end the session, setup problems
//!   after construction are retried on the next tick
//! - Transmit overflow evicts the oldest unsent byte. Lossy: `send_byte`
//!   must neither fail nor block

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::buffer::RingBuffer;
use crate::config::validation::validate_uart;
use crate::config::UartConfig;
use crate::net::{BannerLatch, Listener, Session, WelcomeCursor};
use crate::observability::{metrics, Diagnostics};
use crate::uart::error::{BridgeError, ReceiveError, SessionError};
use crate::uart::transfer::{self, ReceiveOutcome};

/// Externally visible link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No socket open; the next tick re-opens the listener.
    Idle,
    /// Waiting for a client.
    Listening,
    /// A client is attached.
    Connected,
}

#[derive(Debug)]
enum Link {
    Idle,
    Listening(Listener),
    Connected(Session),
}

/// A UART exposed as a single-client TCP endpoint.
#[derive(Debug)]
pub struct UartBridge {
    bind_addr: SocketAddrV4,
    welcome: Box<[u8]>,
    tx: RingBuffer,
    rx: RingBuffer,
    link: Link,
    banner: BannerLatch,
    reopen_failing: bool,
    diag: Diagnostics,
}

impl UartBridge {
    /// Validate `config` and start listening.
    ///
    /// Fails without producing a bridge if the config is invalid or the
    /// listening socket cannot be set up.
    pub fn new(config: &UartConfig) -> Result<Self, BridgeError> {
        Self::with_welcome(config, config.welcome_bytes())
    }

    /// Like `new`, but with a welcome message given as raw bytes.
    ///
    /// `welcome` replaces `config.welcome_message` and may hold any byte,
    /// including NUL and non-UTF-8 sequences.
    pub fn with_welcome(config: &UartConfig, welcome: &[u8]) -> Result<Self, BridgeError> {
        validate_uart(config).map_err(BridgeError::InvalidConfig)?;

        let ip = if config.loopback_only {
            Ipv4Addr::LOCALHOST
        } else {
            Ipv4Addr::UNSPECIFIED
        };

        let mut bridge = Self {
            bind_addr: SocketAddrV4::new(ip, config.port),
            welcome: welcome.into(),
            tx: RingBuffer::with_usable(config.tx_buffer_size),
            rx: RingBuffer::with_usable(config.rx_buffer_size),
            link: Link::Idle,
            banner: BannerLatch::default(),
            reopen_failing: false,
            diag: Diagnostics::from_config(config),
        };

        let listener = Listener::open(bridge.bind_addr, &mut bridge.banner, &bridge.diag)?;
        bridge.link = Link::Listening(listener);

        tracing::debug!(
            address = %bridge.bind_addr,
            tx_buffer = config.tx_buffer_size,
            rx_buffer = config.rx_buffer_size,
            welcome_len = bridge.welcome.len(),
            "UART bridge created"
        );

        Ok(bridge)
    }

    /// Queue a byte for the client. Never fails and never blocks.
    ///
    /// When the transmit buffer is full the oldest unsent byte is discarded
    /// to make room.
    pub fn send_byte(&mut self, byte: u8) {
        if self.tx.is_full() {
            if let Some(dropped) = self.tx.pop() {
                tracing::trace!(dropped, "Transmit buffer full, evicted oldest byte");
            }
            metrics::record_tx_eviction();
        }
        self.tx.push(byte);
    }

    /// Queue several bytes, with the same eviction policy as `send_byte`.
    pub fn send_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.send_byte(b);
        }
    }

    /// Take the oldest byte received from the client.
    pub fn receive_byte(&mut self) -> Result<u8, ReceiveError> {
        if self.rx.is_empty() {
            return Err(ReceiveError::Empty);
        }
        self.rx.pop().ok_or(ReceiveError::Empty)
    }

    /// Run one step: accept if no client, move data if there is one.
    ///
    /// Returns the number of bytes waiting in the receive buffer.
    pub fn tick(&mut self) -> usize {
        self.accept_if_idle();

        if let Link::Connected(session) = &mut self.link {
            let id = session.id();
            match Self::transfer(session, &mut self.tx, &mut self.rx, &self.welcome) {
                Ok(ReceiveOutcome::Open(_)) => {}
                Ok(ReceiveOutcome::PeerClosed) => {
                    self.diag.info(format_args!("Connection closed at the other end."));
                    tracing::debug!(session_id = %id, "Peer closed the connection");
                    self.close_session("peer_closed");
                }
                Err(e) => {
                    self.diag.warn(format_args!("Connection closed after error: {e}"));
                    tracing::debug!(session_id = %id, error = %e, "Session dropped");
                    self.close_session(e.kind());
                }
            }
        }

        self.rx.len()
    }

    fn transfer(
        session: &mut Session,
        tx: &mut RingBuffer,
        rx: &mut RingBuffer,
        welcome: &[u8],
    ) -> Result<ReceiveOutcome, SessionError> {
        transfer::transmit(session, tx, welcome)?;
        transfer::receive(session, rx)
    }

    fn accept_if_idle(&mut self) {
        if let Link::Idle = self.link {
            match Listener::open(self.bind_addr, &mut self.banner, &self.diag) {
                Ok(listener) => {
                    if std::mem::take(&mut self.reopen_failing) {
                        self.diag.info(format_args!("Listening socket re-opened."));
                    }
                    self.link = Link::Listening(listener);
                }
                Err(e) => {
                    // Only the first failure of a streak is logged.
                    if !std::mem::replace(&mut self.reopen_failing, true) {
                        self.diag.warn(format_args!("{e}, retrying every tick"));
                    }
                    return;
                }
            }
        }

        if let Link::Listening(listener) = &self.link {
            if let Some((stream, peer)) = listener.try_accept(&self.diag) {
                // Replacing the link drops the listener, so further clients
                // are refused instead of queueing behind this one.
                let session = Session::new(stream, peer, WelcomeCursor::start(&self.welcome));
                self.link = Link::Connected(session);
                metrics::record_connection_accepted();
            }
        }
    }

    fn close_session(&mut self, kind: &'static str) {
        if let Link::Connected(_) = self.link {
            self.link = Link::Idle;
            metrics::record_session_closed(kind);
        }
    }

    /// Drop the current client, if any. The next tick listens again.
    ///
    /// Returns whether a client was attached.
    pub fn disconnect(&mut self) -> bool {
        let connected = self.is_connected();
        if connected {
            self.diag.info(format_args!("Connection closed locally."));
            self.close_session("local");
        }
        connected
    }

    pub fn state(&self) -> LinkState {
        match self.link {
            Link::Idle => LinkState::Idle,
            Link::Listening(_) => LinkState::Listening,
            Link::Connected(_) => LinkState::Connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.link, Link::Connected(_))
    }

    /// Address of the attached client.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        match &self.link {
            Link::Connected(session) => Some(session.peer_addr()),
            _ => None,
        }
    }

    /// Address the bridge listens on between clients.
    pub fn listen_addr(&self) -> SocketAddrV4 {
        self.bind_addr
    }

    /// Bytes waiting in the receive buffer.
    pub fn available(&self) -> usize {
        self.rx.len()
    }

    /// Bytes queued for the client and not yet sent.
    pub fn pending_transmit(&self) -> usize {
        self.tx.len()
    }

    /// Whether the current client still has welcome bytes coming.
    pub fn welcome_pending(&self) -> bool {
        match &self.link {
            Link::Connected(session) => session.welcome().is_pending(),
            _ => false,
        }
    }
}
