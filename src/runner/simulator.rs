//! Drives a bridge and a device at a fixed tick rate.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::RunnerConfig;
use crate::device::Device;
use crate::uart::UartBridge;

/// A bridge plus the device standing in for the simulated CPU.
pub struct Simulator<D> {
    bridge: UartBridge,
    device: D,
    config: RunnerConfig,
    ticks: u64,
}

impl<D: Device> Simulator<D> {
    pub fn new(bridge: UartBridge, device: D, config: RunnerConfig) -> Self {
        Self {
            bridge,
            device,
            config,
            ticks: 0,
        }
    }

    /// One synchronous step: tick the bridge, then let the device react.
    pub fn step(&mut self) -> usize {
        let available = self.bridge.tick();
        self.device.on_tick(&mut self.bridge, available);
        self.ticks += 1;
        available
    }

    fn finished(&self) -> bool {
        self.config.max_ticks.is_some_and(|max| self.ticks >= max)
    }

    /// Tick until shutdown is signalled or `max_ticks` is reached.
    ///
    /// Returns the simulator so callers can inspect the final state.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Self {
        tracing::info!(
            interval_us = self.config.tick_interval_us,
            max_ticks = ?self.config.max_ticks,
            "Simulator starting"
        );

        let interval = Duration::from_micros(self.config.tick_interval_us.max(1));
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.finished() {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Simulator received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        tracing::info!(ticks = self.ticks, "Simulator stopped");
        self
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn bridge(&self) -> &UartBridge {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut UartBridge {
        &mut self.bridge
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UartConfig;
    use crate::lifecycle::Shutdown;

    #[derive(Default)]
    struct CountingDevice {
        calls: usize,
    }

    impl Device for CountingDevice {
        fn on_tick(&mut self, _bridge: &mut UartBridge, available: usize) {
            assert_eq!(available, 0);
            self.calls += 1;
        }
    }

    fn bridge(port: u16) -> UartBridge {
        UartBridge::new(&UartConfig {
            port,
            diagnostics: false,
            ..UartConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn stops_after_max_ticks() {
        let config = RunnerConfig {
            tick_interval_us: 50,
            max_ticks: Some(25),
        };
        let shutdown = Shutdown::new();
        let sim = Simulator::new(bridge(28321), CountingDevice::default(), config);

        let sim = sim.run(shutdown.subscribe()).await;
        assert_eq!(sim.ticks(), 25);
        assert_eq!(sim.device().calls, 25);
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let config = RunnerConfig {
            tick_interval_us: 1000,
            max_ticks: None,
        };
        let shutdown = Shutdown::new();
        let sim = Simulator::new(bridge(28322), CountingDevice::default(), config);
        let handle = tokio::spawn(sim.run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();

        let sim = time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("simulator did not stop")
            .unwrap();
        assert!(sim.ticks() > 0);
    }
}
