//! Simulated devices that sit on the CPU side of the UART.
//!
//! In a real testbench the simulated CPU calls `send_byte`/`receive_byte`.
//! A `Device` stands in for that CPU so the bridge can run on its own.

pub mod echo;

pub use echo::EchoDevice;

use crate::uart::UartBridge;

/// Called once per tick, right after `UartBridge::tick`.
pub trait Device {
    /// `available` is the value the tick just returned.
    fn on_tick(&mut self, bridge: &mut UartBridge, available: usize);
}
