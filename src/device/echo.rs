//! Echo console: every received byte goes straight back to the client.

use crate::device::Device;
use crate::uart::UartBridge;

/// Log target for per-byte device output.
const TARGET: &str = "uart_bridge::device";

#[derive(Debug, Default)]
pub struct EchoDevice {
    echoed: u64,
}

impl EchoDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes echoed so far.
    pub fn echoed(&self) -> u64 {
        self.echoed
    }
}

impl Device for EchoDevice {
    fn on_tick(&mut self, bridge: &mut UartBridge, available: usize) {
        for _ in 0..available {
            let Ok(byte) = bridge.receive_byte() else {
                break;
            };
            tracing::debug!(target: TARGET, "UART received char: '{}'", printable(byte));
            bridge.send_byte(byte);
            self.echoed += 1;
        }
    }
}

/// Control codes are shown as `?`.
pub fn printable(byte: u8) -> char {
    if byte >= 0x20 {
        char::from(byte)
    } else {
        '?'
    }
}
