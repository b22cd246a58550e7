//! Listening socket for the single UART client.
//!
//! # Responsibilities
//! - Create, configure and bind the accept-side socket
//! - Accept at most one pending client without blocking
//! - Print the bind banner once per bridge, however often the socket is recreated
//!
//! # Design Decisions
//! - Backlog of 1: a second client waiting behind the first gains nothing
//! - The socket is non-blocking; `WouldBlock` from accept is the zero-timeout
//!   readiness check
//! - Accept errors are soft; the client can simply reconnect

use std::io;
use std::net::{SocketAddr, SocketAddrV4, TcpListener, TcpStream};

use socket2::{Domain, Protocol, Socket, Type};

use crate::observability::Diagnostics;
use crate::uart::error::{BridgeError, ListenStage};

/// Remembers whether the bind banner has been printed.
///
/// Lives in the bridge rather than the listener, so it survives the
/// close/re-open cycle after every disconnect.
#[derive(Debug, Default)]
pub struct BannerLatch {
    shown: bool,
}

impl BannerLatch {
    /// Returns `true` exactly once.
    pub fn claim(&mut self) -> bool {
        !std::mem::replace(&mut self.shown, true)
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

/// Text of the bind banner.
pub fn bind_banner(addr: SocketAddrV4) -> String {
    let scope = if addr.ip().is_loopback() { "local only" } else { "all" };
    format!(
        "Listening on IP address {} ({}), TCP port {}.",
        addr.ip(),
        scope,
        addr.port()
    )
}

/// A bound, listening, non-blocking TCP socket.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    addr: SocketAddrV4,
}

impl Listener {
    /// Create the socket, bind it to `addr` and start listening.
    ///
    /// On failure the partially set up socket is closed before the error is
    /// returned.
    pub fn open(
        addr: SocketAddrV4,
        banner: &mut BannerLatch,
        diag: &Diagnostics,
    ) -> Result<Self, BridgeError> {
        let fail = |stage: ListenStage| move |source: io::Error| BridgeError::Listen { stage, source };

        // socket2 sets close-on-exec on creation.
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(fail(ListenStage::Create))?;

        // A restarted simulation should not trip over the previous run's port
        // lingering in TIME_WAIT.
        socket
            .set_reuse_address(true)
            .map_err(fail(ListenStage::ReuseAddress))?;
        socket
            .set_nonblocking(true)
            .map_err(fail(ListenStage::NonBlocking))?;
        socket
            .bind(&SocketAddr::V4(addr).into())
            .map_err(fail(ListenStage::Bind))?;

        if banner.claim() {
            diag.info(format_args!("{}", bind_banner(addr)));
        }

        socket.listen(1).map_err(fail(ListenStage::Listen))?;

        tracing::debug!(address = %addr, "Listener bound");

        Ok(Self {
            inner: socket.into(),
            addr,
        })
    }

    /// Accept a pending client, if there is one.
    ///
    /// Returns `None` when nobody is waiting or when accepting failed; the
    /// listener stays usable either way.
    pub fn try_accept(&self, diag: &Diagnostics) -> Option<(TcpStream, SocketAddr)> {
        match self.inner.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    diag.warn(format_args!(
                        "Error accepting a connection on the listening socket: {e}"
                    ));
                    return None;
                }
                diag.info(format_args!(
                    "Accepted an incoming connection from IP address {}, TCP port {}.",
                    peer.ip(),
                    peer.port()
                ));
                Some((stream, peer))
            }
            Err(e) if is_transient(&e) => None,
            Err(e) => {
                diag.warn(format_args!(
                    "Error accepting a connection on the listening socket: {e}"
                ));
                None
            }
        }
    }

    /// The address this listener was bound to.
    pub fn addr(&self) -> SocketAddrV4 {
        self.addr
    }
}

/// Errors that only mean "nothing to do right now".
pub(crate) fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn banner_latch_claims_once() {
        let mut latch = BannerLatch::default();
        assert!(!latch.is_shown());
        assert!(latch.claim());
        assert!(latch.is_shown());
        assert!(!latch.claim());
        assert!(!latch.claim());
    }

    #[test]
    fn banner_text() {
        assert_eq!(
            bind_banner(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5000)),
            "Listening on IP address 127.0.0.1 (local only), TCP port 5000."
        );
        assert_eq!(
            bind_banner(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 5001)),
            "Listening on IP address 0.0.0.0 (all), TCP port 5001."
        );
    }

    #[test]
    fn accept_without_client_returns_none() {
        let diag = Diagnostics::new(false, "");
        let mut latch = BannerLatch::default();
        let listener =
            Listener::open(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 28301), &mut latch, &diag).unwrap();
        assert!(latch.is_shown());
        assert!(listener.try_accept(&diag).is_none());
        assert_eq!(listener.addr().port(), 28301);
    }

    #[test]
    fn bind_conflict_reports_bind_stage() {
        let diag = Diagnostics::new(false, "");
        let addr = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 28302);
        let _first = Listener::open(addr, &mut BannerLatch::default(), &diag).unwrap();

        match Listener::open(addr, &mut BannerLatch::default(), &diag) {
            Err(BridgeError::Listen { stage, .. }) => assert_eq!(stage, ListenStage::Bind),
            other => panic!("expected bind failure, got {other:?}"),
        }
    }
}
