//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Create bridge (binds listener) → Build simulator
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Simulator leaves its loop → Sockets dropped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Dropping the bridge closes whichever socket is open

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
