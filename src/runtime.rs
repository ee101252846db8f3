//! Main control loop.
//!
//! One [`Context`] owns everything the loop touches: the transport, the
//! manual-mode cycler, and the button. Each tick services the broker link
//! without blocking, then polls the button, then sleeps the configured loop
//! delay. Remote commands arrive through the transport's registered handler,
//! so the tick itself never parses payloads.

use crate::hardware::Button;
use crate::manual::ModeCycler;
use crate::transport::{BrokerLink, MqttTransport};
use std::time::Duration;
use tracing::info;

pub struct Context<L: BrokerLink> {
    transport: MqttTransport<L>,
    cycler: ModeCycler,
    button: Box<dyn Button>,
    loop_delay: Duration,
}

impl<L: BrokerLink> Context<L> {
    pub fn new(
        transport: MqttTransport<L>,
        cycler: ModeCycler,
        button: Box<dyn Button>,
        loop_delay: Duration,
    ) -> Self {
        Self {
            transport,
            cycler,
            button,
            loop_delay,
        }
    }

    /// Run until interrupted.
    pub async fn run(mut self) {
        info!(loop_delay_ms = self.loop_delay.as_millis() as u64, "control loop started");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested");
                    break;
                }
                _ = self.tick() => {}
            }
        }
    }

    /// One loop iteration: transport work, button poll, pacing delay.
    pub async fn tick(&mut self) {
        self.transport.service_tick().await;
        if self.button.was_pressed() {
            self.cycler.on_button_press();
        }
        tokio::time::sleep(self.loop_delay).await;
    }
}
