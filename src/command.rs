//! Remote command vocabulary and dispatch.
//!
//! The vocabulary is closed: six tokens, one per actuator operation.
//! Anything else is rejected without side effects. The dispatcher holds an
//! explicit handle to the actuator rather than reaching through a global,
//! and reports a distinct outcome when dispatched before wiring completes.

use crate::actuator::ActuatorStateMachine;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

/// A remote command drawn from the fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartHeating,
    FinishHeating,
    StartCooling,
    FinishCooling,
    StartSplash,
    FinishSplash,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::StartHeating,
        Command::FinishHeating,
        Command::StartCooling,
        Command::FinishCooling,
        Command::StartSplash,
        Command::FinishSplash,
    ];

    /// Wire token for this command.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::StartHeating => "start_heating",
            Command::FinishHeating => "finish_heating",
            Command::StartCooling => "start_cooling",
            Command::FinishCooling => "finish_cooling",
            Command::StartSplash => "start_splash",
            Command::FinishSplash => "finish_splash",
        }
    }
}

/// Token outside the fixed command vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommandError(pub String);

impl FromStr for Command {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_heating" => Ok(Command::StartHeating),
            "finish_heating" => Ok(Command::FinishHeating),
            "start_cooling" => Ok(Command::StartCooling),
            "finish_cooling" => Ok(Command::FinishCooling),
            "start_splash" => Ok(Command::StartSplash),
            "finish_splash" => Ok(Command::FinishSplash),
            other => Err(UnknownCommandError(other.to_string())),
        }
    }
}

/// Result of a dispatch attempt, for callers and tests that need to know
/// exactly what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Exactly one actuator operation was invoked.
    Dispatched(Command),
    /// Token outside the vocabulary; no operation invoked.
    UnknownCommand,
    /// No actuator attached yet; no operation invoked.
    NotReady,
}

/// Sink for validated-or-rejected inbound command strings.
///
/// The transport forwards every inbound command token here by value; the
/// implementation decides what it means.
pub trait CommandHandler: Send {
    fn handle_command(&mut self, command: &str);
}

/// Maps inbound command tokens onto actuator operations.
pub struct CommandDispatcher {
    actuator: Option<Arc<Mutex<ActuatorStateMachine>>>,
}

impl CommandDispatcher {
    /// A dispatcher with no actuator attached. Dispatching in this state is
    /// a logged no-op, guarding against messages that arrive before setup
    /// completes.
    pub fn new() -> Self {
        Self { actuator: None }
    }

    pub fn with_actuator(actuator: Arc<Mutex<ActuatorStateMachine>>) -> Self {
        Self {
            actuator: Some(actuator),
        }
    }

    pub fn set_actuator(&mut self, actuator: Arc<Mutex<ActuatorStateMachine>>) {
        self.actuator = Some(actuator);
    }

    /// Look the token up in the vocabulary and invoke exactly the matching
    /// actuator operation. Synchronous and non-blocking; never waits on I/O.
    pub fn dispatch(&self, raw: &str) -> DispatchOutcome {
        let Some(actuator) = &self.actuator else {
            warn!(command = %raw, "commands handler not initialized, dropping command");
            return DispatchOutcome::NotReady;
        };

        let command = match Command::from_str(raw) {
            Ok(command) => command,
            Err(e) => {
                warn!("unrecognized command: {e}");
                return DispatchOutcome::UnknownCommand;
            }
        };

        info!(command = command.as_str(), "executing command");
        let mut actuator = actuator.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match command {
            Command::StartHeating => actuator.start_heating(),
            Command::FinishHeating => actuator.finish_heating(),
            Command::StartCooling => actuator.start_cooling(),
            Command::FinishCooling => actuator.finish_cooling(),
            Command::StartSplash => actuator.start_splash(),
            Command::FinishSplash => actuator.finish_splash(),
        }
        DispatchOutcome::Dispatched(command)
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for CommandDispatcher {
    fn handle_command(&mut self, command: &str) {
        self.dispatch(command);
    }
}
