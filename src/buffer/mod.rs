//! Byte buffering subsystem.
//!
//! # Data Flow
//! ```text
//! producer.send_byte()  → transmit RingBuffer → transfer engine → socket
//! socket → transfer engine → receive RingBuffer → consumer.receive_byte()
//! ```
//!
//! # Design Decisions
//! - Both directions use the same fixed-capacity ring
//! - Overflow policy lives with the caller, not the ring

pub mod ring;

pub use ring::RingBuffer;

/// Smallest buffer size accepted in either direction.
///
/// A 16550 FIFO holds 16 bytes and its trigger levels go up to 14, so
/// anything smaller would behave unlike the hardware being emulated.
pub const MIN_BUFFER_SIZE: usize = 16;
