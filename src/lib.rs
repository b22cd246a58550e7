//! UART-over-TCP bridge for hardware simulation testbenches.
//!
//! A simulated UART is exposed as a single-client TCP endpoint. The
//! testbench calls [`UartBridge::tick`] once per simulated clock tick; the
//! bridge never blocks and never owns a thread.

pub mod buffer;
pub mod config;
pub mod device;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod runner;
pub mod uart;

pub use config::{AppConfig, UartConfig};
pub use lifecycle::Shutdown;
pub use uart::{BridgeError, LinkState, ReceiveError, UartBridge};
