//! Local manual-override cycle, independent of remote commands.
//!
//! Each button press advances a four-valued mode and re-applies that mode's
//! canonical actuator configuration. Application goes through the actuator's
//! idempotent finish/start operations only, so the manual path can never
//! reach a state the remote path couldn't.

use crate::actuator::ActuatorStateMachine;
use std::sync::{Arc, Mutex};
use tracing::info;

/// The button-driven operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualMode {
    Stop,
    Cooling,
    Heating,
    Splash,
}

impl ManualMode {
    /// Next mode in the cycle, wrapping after the last value.
    pub fn next(self) -> Self {
        match self {
            ManualMode::Stop => ManualMode::Cooling,
            ManualMode::Cooling => ManualMode::Heating,
            ManualMode::Heating => ManualMode::Splash,
            ManualMode::Splash => ManualMode::Stop,
        }
    }
}

/// Advances the manual mode on button presses and applies it to the rig.
pub struct ModeCycler {
    mode: ManualMode,
    actuator: Arc<Mutex<ActuatorStateMachine>>,
}

impl ModeCycler {
    pub fn new(actuator: Arc<Mutex<ActuatorStateMachine>>) -> Self {
        Self {
            mode: ManualMode::Stop,
            actuator,
        }
    }

    pub fn mode(&self) -> ManualMode {
        self.mode
    }

    /// Advance the mode, then drive the actuator to that mode's canonical
    /// configuration. Idempotent with respect to whatever state the
    /// actuator was in before the press.
    pub fn on_button_press(&mut self) {
        self.mode = self.mode.next();
        info!(mode = ?self.mode, "manual mode changed");
        self.apply();
    }

    fn apply(&mut self) {
        let mut actuator = self
            .actuator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.mode {
            ManualMode::Stop => {
                actuator.finish_heating();
                actuator.finish_cooling();
                actuator.finish_splash();
            }
            ManualMode::Cooling => {
                actuator.start_cooling();
                actuator.finish_heating();
                actuator.finish_splash();
            }
            ManualMode::Heating => {
                actuator.start_heating();
                actuator.finish_cooling();
                actuator.finish_splash();
            }
            ManualMode::Splash => {
                actuator.start_splash();
                actuator.finish_heating();
                actuator.finish_cooling();
            }
        }
    }
}
