//! Human-readable UART diagnostics.
//!
//! A testbench often runs several UARTs at once, so every line carries the
//! configured prefix. Informational lines can be switched off; error lines
//! cannot, since they explain why a client was dropped.

use std::fmt;

use crate::config::UartConfig;

/// Log target for all diagnostic lines.
pub const TARGET: &str = "uart_bridge::diag";

/// Prefixed line writer owned by one bridge.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    prefix: String,
}

impl Diagnostics {
    pub fn new(enabled: bool, prefix: impl Into<String>) -> Self {
        Self {
            enabled,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &UartConfig) -> Self {
        Self::new(config.diagnostics, config.diagnostics_prefix.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Emit an informational line if diagnostics are enabled.
    pub fn info(&self, message: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::info!(target: TARGET, "{}", self.line(message));
        }
    }

    /// Emit a failure line at `warn`.
    ///
    /// Not gated by the diagnostics flag: a quiet bridge still says why it
    /// dropped a client.
    pub fn warn(&self, message: fmt::Arguments<'_>) {
        tracing::warn!(target: TARGET, "{}", self.line(message));
    }

    fn line(&self, message: fmt::Arguments<'_>) -> String {
        format!("{}{}", self.prefix, message)
    }
}
