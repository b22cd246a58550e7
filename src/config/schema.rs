//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Emulated UART endpoint (port, buffers, welcome message).
    pub uart: UartConfig,

    /// Tick driver settings.
    pub runner: RunnerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Settings for one emulated UART.
///
/// Fixed for the lifetime of a [`UartBridge`](crate::uart::UartBridge).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UartConfig {
    /// TCP port to listen on. Must be non-zero.
    pub port: u16,

    /// Bind to 127.0.0.1 only instead of every interface.
    pub loopback_only: bool,

    /// Usable transmit buffer size in bytes (at least 16).
    pub tx_buffer_size: usize,

    /// Usable receive buffer size in bytes (at least 16).
    pub rx_buffer_size: usize,

    /// Greeting sent to every new client before any queued data.
    ///
    /// TOML strings are UTF-8; use `UartBridge::with_welcome` for other bytes.
    pub welcome_message: Option<String>,

    /// Emit informational lines (bind banner, connects, disconnects).
    pub diagnostics: bool,

    /// Prepended to every diagnostic line.
    pub diagnostics_prefix: String,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            port: 4567,
            loopback_only: true,
            tx_buffer_size: 1024,
            rx_buffer_size: 1024,
            welcome_message: None,
            diagnostics: true,
            diagnostics_prefix: "UART: ".to_string(),
        }
    }
}

impl UartConfig {
    /// Welcome message as raw bytes; empty when none is configured.
    pub fn welcome_bytes(&self) -> &[u8] {
        self.welcome_message.as_deref().map(str::as_bytes).unwrap_or_default()
    }
}

/// Tick driver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Wall-clock time between two ticks, in microseconds.
    pub tick_interval_us: u64,

    /// Stop after this many ticks (runs until a signal when unset).
    pub max_ticks: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 100,
            max_ticks: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
