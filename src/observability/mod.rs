//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! UartBridge produces:
//!     → diagnostics.rs (prefixed human-readable lines, gated by config)
//!     → metrics.rs (byte counters, connection gauge)
//!
//! The binary installs:
//!     → logging.rs (tracing subscriber, stdout)
//!     → metrics.rs (optional Prometheus endpoint)
//! ```
//!
//! # Design Decisions
//! - Every line goes through `tracing`; the library never prints directly
//! - Metric updates are no-ops until an exporter is installed

pub mod diagnostics;
pub mod logging;
pub mod metrics;

pub use diagnostics::Diagnostics;
