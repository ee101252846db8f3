//! Raspberry Pi backend: GPIO button, H-bridge motor channels, RGB LED.
//!
//! Pin assignments follow the reference wiring of the rig carrier board.

use super::{Button, LedColor, MotorChannel, MotorDriver, StatusLed};
use rppal::gpio::{Gpio, InputPin, Level, OutputPin};
use tracing::debug;

const PIN_PELTIER_FWD: u8 = 17;
const PIN_PELTIER_REV: u8 = 27;
const PIN_SPLASH: u8 = 22;
const PIN_LED_R: u8 = 5;
const PIN_LED_G: u8 = 6;
const PIN_LED_B: u8 = 13;
const PIN_BUTTON: u8 = 26;

/// Open all rig peripherals. Fails only if the GPIO character device is
/// unavailable or a pin is already claimed.
pub fn open() -> Result<(RpiMotor, RpiLed, RpiButton), rppal::gpio::Error> {
    let gpio = Gpio::new()?;
    let motor = RpiMotor {
        peltier_fwd: gpio.get(PIN_PELTIER_FWD)?.into_output(),
        peltier_rev: gpio.get(PIN_PELTIER_REV)?.into_output(),
        splash: gpio.get(PIN_SPLASH)?.into_output(),
    };
    let led = RpiLed {
        red: gpio.get(PIN_LED_R)?.into_output(),
        green: gpio.get(PIN_LED_G)?.into_output(),
        blue: gpio.get(PIN_LED_B)?.into_output(),
    };
    let button = RpiButton {
        pin: gpio.get(PIN_BUTTON)?.into_input_pullup(),
        last: Level::High,
    };
    Ok((motor, led, button))
}

/// H-bridge outputs for the Peltier channel plus the splash pump relay.
pub struct RpiMotor {
    peltier_fwd: OutputPin,
    peltier_rev: OutputPin,
    splash: OutputPin,
}

impl MotorDriver for RpiMotor {
    fn set_speed(&mut self, channel: MotorChannel, value: i16) {
        debug!(?channel, value, "gpio motor write");
        match channel {
            MotorChannel::Peltier => {
                // Positive drives cooling, negative heating, zero coasts.
                if value > 0 {
                    self.peltier_rev.set_low();
                    self.peltier_fwd.set_high();
                } else if value < 0 {
                    self.peltier_fwd.set_low();
                    self.peltier_rev.set_high();
                } else {
                    self.peltier_fwd.set_low();
                    self.peltier_rev.set_low();
                }
            }
            MotorChannel::Splash => {
                if value != 0 {
                    self.splash.set_high();
                } else {
                    self.splash.set_low();
                }
            }
        }
    }
}

/// Common-cathode RGB indicator on three GPIO lines.
pub struct RpiLed {
    red: OutputPin,
    green: OutputPin,
    blue: OutputPin,
}

impl StatusLed for RpiLed {
    fn set_color(&mut self, color: LedColor) {
        let (r, g, b) = color.rgb();
        set_level(&mut self.red, r > 0);
        set_level(&mut self.green, g > 0);
        set_level(&mut self.blue, b > 0);
    }
}

fn set_level(pin: &mut OutputPin, on: bool) {
    if on {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

/// Active-low push-button with internal pull-up, polled for falling edges.
pub struct RpiButton {
    pin: InputPin,
    last: Level,
}

impl Button for RpiButton {
    fn was_pressed(&mut self) -> bool {
        let now = self.pin.read();
        let pressed = self.last == Level::High && now == Level::Low;
        self.last = now;
        pressed
    }
}
