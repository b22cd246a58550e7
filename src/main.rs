//! UART bridge (v1)
//!
//! Runs one emulated UART with an echo console behind it.
//!
//! # Architecture Overview
//!
//! ```text
//!   terminal / test script                     uart-bridge
//!  ┌──────────────────────┐   TCP   ┌───────────────────────────────────────┐
//!  │                      │◀───────▶│  net::listener ─▶ net::session        │
//!  │  telnet, nc, pytest  │         │          │                            │
//!  └──────────────────────┘         │          ▼                            │
//!                                   │  uart::transfer ◀─▶ buffer::RingBuffer │
//!                                   │          ▲                            │
//!                                   │          │ tick()                     │
//!                                   │  runner::Simulator ─▶ device::Echo    │
//!                                   └───────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use uart_bridge::config::{load_config, AppConfig};
use uart_bridge::lifecycle::{signals, startup, Shutdown};
use uart_bridge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "uart-bridge")]
#[command(about = "Expose an emulated UART as a single-client TCP endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Listen on every interface instead of loopback only
    #[arg(long)]
    all_interfaces: bool,

    /// Greeting sent to each new client
    #[arg(short, long)]
    welcome: Option<String>,

    /// Microseconds between ticks
    #[arg(long)]
    tick_interval_us: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Suppress informational UART diagnostics
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.uart.port = port;
        }
        if self.all_interfaces {
            config.uart.loopback_only = false;
        }
        if let Some(welcome) = &self.welcome {
            config.uart.welcome_message = Some(welcome.clone());
        }
        if let Some(interval) = self.tick_interval_us {
            config.runner.tick_interval_us = interval;
        }
        if self.max_ticks.is_some() {
            config.runner.max_ticks = self.max_ticks;
        }
        if self.quiet {
            config.uart.diagnostics = false;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };
    cli.apply(&mut config);

    logging::init_logging(&config.observability.log_level);
    tracing::info!("uart-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    let simulator = match startup::build_echo_simulator(&config) {
        Ok(simulator) => simulator,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    let signal_task = signals::spawn_signal_listener(Arc::clone(&shutdown));

    let simulator = simulator.run(shutdown.subscribe()).await;
    signal_task.abort();

    tracing::info!(
        ticks = simulator.ticks(),
        echoed = simulator.device().echoed(),
        "Shutdown complete"
    );
    ExitCode::SUCCESS
}
