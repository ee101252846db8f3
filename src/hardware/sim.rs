//! Simulated rig for hosted runs without attached hardware.
//!
//! Every write is logged so a host session shows exactly what the physical
//! rig would be doing.

use super::{Button, LedColor, MotorChannel, MotorDriver, StatusLed};
use tracing::info;

/// Logs motor writes instead of driving a motion controller.
#[derive(Debug, Default)]
pub struct SimulatedMotor;

impl SimulatedMotor {
    pub fn new() -> Self {
        Self
    }
}

impl MotorDriver for SimulatedMotor {
    fn set_speed(&mut self, channel: MotorChannel, value: i16) {
        info!(?channel, value, "simulated motor write");
    }
}

/// Logs indicator changes instead of driving an LED.
#[derive(Debug, Default)]
pub struct SimulatedLed;

impl SimulatedLed {
    pub fn new() -> Self {
        Self
    }
}

impl StatusLed for SimulatedLed {
    fn set_color(&mut self, color: LedColor) {
        info!(?color, "simulated status led");
    }
}

/// A button that is never pressed. Hosted runs are driven remotely.
#[derive(Debug, Default)]
pub struct IdleButton;

impl Button for IdleButton {
    fn was_pressed(&mut self) -> bool {
        false
    }
}
