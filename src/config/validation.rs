//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port non-zero, buffer minimums, tick interval)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::buffer::MIN_BUFFER_SIZE;
use crate::config::schema::{AppConfig, UartConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid TCP port 0")]
    ZeroPort,

    #[error("invalid {direction} buffer size {size} (minimum {})", MIN_BUFFER_SIZE)]
    BufferTooSmall { direction: &'static str, size: usize },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check the settings of a single UART.
pub fn validate_uart(config: &UartConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.tx_buffer_size < MIN_BUFFER_SIZE {
        errors.push(ValidationError::BufferTooSmall {
            direction: "transmit",
            size: config.tx_buffer_size,
        });
    }
    if config.rx_buffer_size < MIN_BUFFER_SIZE {
        errors.push(ValidationError::BufferTooSmall {
            direction: "receive",
            size: config.rx_buffer_size,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a whole application config.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_uart(&config.uart).err().unwrap_or_default();

    if config.runner.tick_interval_us == 0 {
        errors.push(ValidationError::ZeroTickInterval);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let config = UartConfig { port: 0, ..UartConfig::default() };
        assert_eq!(validate_uart(&config), Err(vec![ValidationError::ZeroPort]));
    }

    #[test]
    fn minimum_buffer_size_accepted() {
        let config = UartConfig {
            tx_buffer_size: 16,
            rx_buffer_size: 16,
            ..UartConfig::default()
        };
        assert!(validate_uart(&config).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = AppConfig::default();
        config.uart.port = 0;
        config.uart.tx_buffer_size = 15;
        config.uart.rx_buffer_size = 1;
        config.runner.tick_interval_us = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroPort,
                ValidationError::BufferTooSmall { direction: "transmit", size: 15 },
                ValidationError::BufferTooSmall { direction: "receive", size: 1 },
                ValidationError::ZeroTickInterval,
                ValidationError::MetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn error_messages() {
        let err = ValidationError::BufferTooSmall { direction: "receive", size: 8 };
        assert_eq!(err.to_string(), "invalid receive buffer size 8 (minimum 16)");
    }
}
