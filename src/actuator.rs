//! Actuator state machine for the thermal/splash rig.
//!
//! Heating and cooling share one bidirectional Peltier channel and are
//! mutually exclusive by construction: the thermal axis is a single
//! [`ThermalState`] value, so the invalid heating-and-cooling combination is
//! unrepresentable. Splash runs on its own channel and combines freely with
//! either thermal state.
//!
//! Every operation is idempotent and infallible: it writes the motor value,
//! updates the state, and recomputes the status LED. The LED color is a pure
//! function of state, never stored.

use crate::hardware::{drive, LedColor, MotorChannel, MotorDriver, StatusLed};
use tracing::info;

/// Exclusive thermal axis of the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalState {
    Idle,
    Heating,
    Cooling,
}

/// Derive the indicator color from actuator state.
///
/// Priority table, first match wins. The combined colors encode additive
/// intuition: heating+splash reads distinctly from heating alone.
pub fn led_color(thermal: ThermalState, splashing: bool) -> LedColor {
    match (thermal, splashing) {
        (ThermalState::Heating, true) => LedColor::Yellow,
        (ThermalState::Cooling, true) => LedColor::Cyan,
        (ThermalState::Heating, false) => LedColor::Red,
        (ThermalState::Cooling, false) => LedColor::Blue,
        (ThermalState::Idle, true) => LedColor::Green,
        (ThermalState::Idle, false) => LedColor::Off,
    }
}

/// Owns the actuator state and the physical outputs it drives.
pub struct ActuatorStateMachine {
    thermal: ThermalState,
    splashing: bool,
    motor: Box<dyn MotorDriver>,
    led: Box<dyn StatusLed>,
}

impl ActuatorStateMachine {
    /// Start in the all-stopped state and push the derived (off) color to
    /// the indicator.
    pub fn new(motor: Box<dyn MotorDriver>, led: Box<dyn StatusLed>) -> Self {
        let mut machine = Self {
            thermal: ThermalState::Idle,
            splashing: false,
            motor,
            led,
        };
        machine.refresh_led();
        info!("actuator state machine initialized");
        machine
    }

    pub fn thermal(&self) -> ThermalState {
        self.thermal
    }

    pub fn is_splashing(&self) -> bool {
        self.splashing
    }

    /// Drive the Peltier channel to heat. Cancels cooling unconditionally;
    /// the two share the channel.
    pub fn start_heating(&mut self) {
        self.motor.set_speed(MotorChannel::Peltier, drive::HEATING);
        self.thermal = ThermalState::Heating;
        self.refresh_led();
        info!("start_heating executed");
    }

    /// Stop heating. A no-op on the motor when not heating, but the LED is
    /// still recomputed and the call is still logged.
    pub fn finish_heating(&mut self) {
        if self.thermal == ThermalState::Heating {
            self.motor.set_speed(MotorChannel::Peltier, drive::STOP);
            self.thermal = ThermalState::Idle;
        }
        self.refresh_led();
        info!("finish_heating executed");
    }

    /// Drive the Peltier channel to cool. Cancels heating unconditionally.
    pub fn start_cooling(&mut self) {
        self.motor.set_speed(MotorChannel::Peltier, drive::COOLING);
        self.thermal = ThermalState::Cooling;
        self.refresh_led();
        info!("start_cooling executed");
    }

    pub fn finish_cooling(&mut self) {
        if self.thermal == ThermalState::Cooling {
            self.motor.set_speed(MotorChannel::Peltier, drive::STOP);
            self.thermal = ThermalState::Idle;
        }
        self.refresh_led();
        info!("finish_cooling executed");
    }

    pub fn start_splash(&mut self) {
        self.motor.set_speed(MotorChannel::Splash, drive::SPLASH_ON);
        self.splashing = true;
        self.refresh_led();
        info!("start_splash executed");
    }

    pub fn finish_splash(&mut self) {
        if self.splashing {
            self.motor.set_speed(MotorChannel::Splash, drive::STOP);
            self.splashing = false;
        }
        self.refresh_led();
        info!("finish_splash executed");
    }

    fn refresh_led(&mut self) {
        self.led.set_color(led_color(self.thermal, self.splashing));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::{MockLed, MockMotorDriver};
    use proptest::prelude::*;

    fn machine() -> (ActuatorStateMachine, MockMotorDriver, MockLed) {
        let motor = MockMotorDriver::default();
        let led = MockLed::default();
        let machine = ActuatorStateMachine::new(Box::new(motor.clone()), Box::new(led.clone()));
        (machine, motor, led)
    }

    #[test]
    fn led_table_is_exact() {
        assert_eq!(led_color(ThermalState::Heating, true), LedColor::Yellow);
        assert_eq!(led_color(ThermalState::Cooling, true), LedColor::Cyan);
        assert_eq!(led_color(ThermalState::Heating, false), LedColor::Red);
        assert_eq!(led_color(ThermalState::Cooling, false), LedColor::Blue);
        assert_eq!(led_color(ThermalState::Idle, true), LedColor::Green);
        assert_eq!(led_color(ThermalState::Idle, false), LedColor::Off);
    }

    #[test]
    fn led_derivation_is_deterministic() {
        for thermal in [ThermalState::Idle, ThermalState::Heating, ThermalState::Cooling] {
            for splashing in [false, true] {
                assert_eq!(led_color(thermal, splashing), led_color(thermal, splashing));
            }
        }
    }

    #[test]
    fn start_heating_cancels_cooling() {
        let (mut machine, motor, led) = machine();
        machine.start_cooling();
        machine.start_heating();

        assert_eq!(machine.thermal(), ThermalState::Heating);
        assert_eq!(motor.last_write(MotorChannel::Peltier), Some(drive::HEATING));
        assert_eq!(led.last(), Some(LedColor::Red));
    }

    #[test]
    fn splash_combines_with_heating() {
        let (mut machine, motor, led) = machine();
        machine.start_heating();
        machine.start_splash();

        assert_eq!(machine.thermal(), ThermalState::Heating);
        assert!(machine.is_splashing());
        assert_eq!(motor.last_write(MotorChannel::Peltier), Some(drive::HEATING));
        assert_eq!(motor.last_write(MotorChannel::Splash), Some(drive::SPLASH_ON));
        assert_eq!(led.last(), Some(LedColor::Yellow));
    }

    #[test]
    fn finish_heating_when_idle_is_a_noop() {
        let (mut machine, motor, led) = machine();
        let writes_before = motor.writes().len();
        let color_before = led.last();

        machine.finish_heating();

        assert_eq!(motor.writes().len(), writes_before, "no motor write expected");
        assert_eq!(led.last(), color_before, "led state unchanged");
        assert_eq!(machine.thermal(), ThermalState::Idle);
    }

    #[test]
    fn finish_cooling_only_stops_cooling() {
        let (mut machine, motor, _led) = machine();
        machine.start_heating();
        let writes_before = motor.writes().len();

        // Heating is active; finishing cooling must not touch the channel.
        machine.finish_cooling();

        assert_eq!(machine.thermal(), ThermalState::Heating);
        assert_eq!(motor.writes().len(), writes_before);
    }

    #[test]
    fn finish_splash_stops_pump_and_reverts_led() {
        let (mut machine, motor, led) = machine();
        machine.start_cooling();
        machine.start_splash();
        machine.finish_splash();

        assert!(!machine.is_splashing());
        assert_eq!(motor.last_write(MotorChannel::Splash), Some(drive::STOP));
        assert_eq!(led.last(), Some(LedColor::Blue));
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        StartHeating,
        FinishHeating,
        StartCooling,
        FinishCooling,
        StartSplash,
        FinishSplash,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::StartHeating),
            Just(Op::FinishHeating),
            Just(Op::StartCooling),
            Just(Op::FinishCooling),
            Just(Op::StartSplash),
            Just(Op::FinishSplash),
        ]
    }

    proptest! {
        /// After any operation sequence the Peltier channel's last write
        /// agrees with the thermal state, and the LED with the full state.
        /// Heating-and-cooling simultaneously cannot even be expressed.
        #[test]
        fn state_and_outputs_agree(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let (mut machine, motor, led) = machine();
            for op in ops {
                match op {
                    Op::StartHeating => machine.start_heating(),
                    Op::FinishHeating => machine.finish_heating(),
                    Op::StartCooling => machine.start_cooling(),
                    Op::FinishCooling => machine.finish_cooling(),
                    Op::StartSplash => machine.start_splash(),
                    Op::FinishSplash => machine.finish_splash(),
                }

                let peltier = motor.last_write(MotorChannel::Peltier);
                match machine.thermal() {
                    ThermalState::Heating => prop_assert_eq!(peltier, Some(drive::HEATING)),
                    ThermalState::Cooling => prop_assert_eq!(peltier, Some(drive::COOLING)),
                    ThermalState::Idle => {
                        if let Some(value) = peltier {
                            prop_assert_eq!(value, drive::STOP);
                        }
                    }
                }
                prop_assert_eq!(
                    led.last(),
                    Some(led_color(machine.thermal(), machine.is_splashing()))
                );
            }
        }
    }
}
