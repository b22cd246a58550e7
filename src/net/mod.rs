//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind once, non-blocking accept, backlog 1)
//!     → session.rs (client socket + welcome cursor)
//!     → uart::transfer (byte-wise drain / fill per tick)
//!
//! Link States:
//!     Listening → Connected → Idle → Listening → ...
//! ```
//!
//! # Design Decisions
//! - Exactly one client at a time; the listener is closed while it is attached
//! - Every socket is non-blocking, so nothing here ever waits

pub mod listener;
pub mod session;

pub use listener::{BannerLatch, Listener};
pub use session::{ReadOutcome, Session, SessionId, WelcomeCursor};
