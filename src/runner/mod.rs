//! Tick driver.
//!
//! # Data Flow
//! ```text
//! tokio interval (tick_interval_us)
//!     → UartBridge::tick
//!     → Device::on_tick
//!     → repeat until shutdown or max_ticks
//! ```
//!
//! # Design Decisions
//! - The bridge itself is synchronous; only the pacing is async
//! - Missed ticks are delayed, never bursted

pub mod simulator;

pub use simulator::Simulator;
