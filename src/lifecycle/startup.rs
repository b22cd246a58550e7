//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Create the bridge (binds the listener)
//! - Pair it with the echo device in a simulator
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use thiserror::Error;

use crate::config::validation::validate_config;
use crate::config::{AppConfig, ConfigError};
use crate::device::EchoDevice;
use crate::runner::Simulator;
use crate::uart::{BridgeError, UartBridge};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Build a ready-to-run echo simulator from a full config.
pub fn build_echo_simulator(config: &AppConfig) -> Result<Simulator<EchoDevice>, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let bridge = UartBridge::new(&config.uart)?;
    tracing::info!(
        address = %bridge.listen_addr(),
        tick_interval_us = config.runner.tick_interval_us,
        "UART bridge ready"
    );

    Ok(Simulator::new(bridge, EchoDevice::new(), config.runner.clone()))
}
