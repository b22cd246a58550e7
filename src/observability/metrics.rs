//! Metrics collection and exposition.
//!
//! # Metrics
//! - `uart_bytes_sent_total` (counter): bytes written to the client, welcome included
//! - `uart_bytes_received_total` (counter): bytes moved into the receive buffer
//! - `uart_tx_evictions_total` (counter): unsent bytes dropped on transmit overflow
//! - `uart_connections_accepted_total` (counter)
//! - `uart_session_errors_total` (counter): sessions torn down, by `kind`
//! - `uart_connected` (gauge): 1 while a client is attached

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_byte_sent() {
    counter!("uart_bytes_sent_total").increment(1);
}

pub fn record_byte_received() {
    counter!("uart_bytes_received_total").increment(1);
}

pub fn record_tx_eviction() {
    counter!("uart_tx_evictions_total").increment(1);
}

pub fn record_connection_accepted() {
    counter!("uart_connections_accepted_total").increment(1);
    gauge!("uart_connected").set(1.0);
}

/// A session ended; `kind` is `peer_closed`, `local`, `send` or `receive`.
pub fn record_session_closed(kind: &'static str) {
    if !matches!(kind, "peer_closed" | "local") {
        counter!("uart_session_errors_total", "kind" => kind).increment(1);
    }
    gauge!("uart_connected").set(0.0);
}
