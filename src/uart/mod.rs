//! UART emulation subsystem.
//!
//! # Data Flow
//! ```text
//! simulated CPU ─ send_byte ─▶ transmit ring ─┐
//!                                             ├─ tick ─▶ transfer.rs ◀─▶ client socket
//! simulated CPU ◀ receive_byte ─ receive ring ┘
//!
//! tick():
//!     1. no client → (re-)open listener, try one non-blocking accept
//!     2. client    → transmit step, then receive step
//!     3. report receive buffer occupancy
//! ```
//!
//! # Design Decisions
//! - Single-threaded and synchronous; the caller owns all timing
//! - Construction errors are fatal, everything after that is soft

pub mod bridge;
pub mod error;
pub mod transfer;

pub use bridge::{LinkState, UartBridge};
pub use error::{BridgeError, ListenStage, ReceiveError, SessionError};
