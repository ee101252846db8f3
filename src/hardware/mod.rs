//! Hardware driver glue for the actuator rig.
//!
//! The actuator state machine drives these traits and never cares which
//! backend is wired in. Writes are treated as always succeeding; a backend
//! that can fail should log and carry on rather than surface an error here.

pub mod sim;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use sim::{IdleButton, SimulatedLed, SimulatedMotor};

/// Physical output channels on the motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorChannel {
    /// Bidirectional Peltier channel shared by heating and cooling.
    Peltier,
    /// Splash pump channel.
    Splash,
}

/// Drive values for the motion controller channels.
///
/// The Peltier channel is signed: positive drives cooling, negative drives
/// heating, zero stops it.
pub mod drive {
    pub const HEATING: i16 = -127;
    pub const COOLING: i16 = 127;
    pub const SPLASH_ON: i16 = 127;
    pub const STOP: i16 = 0;
}

/// Colors the status indicator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Off,
    Red,
    Blue,
    Green,
    Yellow,
    Cyan,
}

impl LedColor {
    /// RGB value for backends that drive raw color channels.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            LedColor::Off => (0, 0, 0),
            LedColor::Red => (255, 0, 0),
            LedColor::Blue => (0, 0, 255),
            LedColor::Green => (0, 255, 0),
            LedColor::Yellow => (255, 255, 0),
            LedColor::Cyan => (0, 255, 255),
        }
    }
}

/// Motion controller output.
pub trait MotorDriver: Send {
    fn set_speed(&mut self, channel: MotorChannel, value: i16);
}

/// RGB status indicator.
pub trait StatusLed: Send {
    fn set_color(&mut self, color: LedColor);
}

/// Push-button input. Edge-triggered: `was_pressed` reports true exactly
/// once per physical press.
pub trait Button: Send {
    fn was_pressed(&mut self) -> bool;
}
