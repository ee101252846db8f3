//! Recording mocks for the hardware traits and the broker link.
//!
//! The mocks clone cheaply and share their recorded state, so a test can hand
//! a clone to the code under test and keep the original for assertions.

use crate::command::CommandHandler;
use crate::hardware::{Button, LedColor, MotorChannel, MotorDriver, StatusLed};
use crate::net::NetworkStatus;
use crate::transport::{BrokerLink, LinkError, LinkEvent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

fn locked<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Motor driver that records every `(channel, value)` write.
#[derive(Debug, Clone, Default)]
pub struct MockMotorDriver {
    writes: Arc<Mutex<Vec<(MotorChannel, i16)>>>,
}

impl MockMotorDriver {
    pub fn writes(&self) -> Vec<(MotorChannel, i16)> {
        locked(&self.writes).clone()
    }

    pub fn last_write(&self, channel: MotorChannel) -> Option<i16> {
        locked(&self.writes)
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
    }
}

impl MotorDriver for MockMotorDriver {
    fn set_speed(&mut self, channel: MotorChannel, value: i16) {
        locked(&self.writes).push((channel, value));
    }
}

/// Status LED that records every color it was set to.
#[derive(Debug, Clone, Default)]
pub struct MockLed {
    colors: Arc<Mutex<Vec<LedColor>>>,
}

impl MockLed {
    pub fn colors(&self) -> Vec<LedColor> {
        locked(&self.colors).clone()
    }

    pub fn last(&self) -> Option<LedColor> {
        locked(&self.colors).last().copied()
    }
}

impl StatusLed for MockLed {
    fn set_color(&mut self, color: LedColor) {
        locked(&self.colors).push(color);
    }
}

/// Button with a scripted queue of presses.
#[derive(Debug, Clone, Default)]
pub struct MockButton {
    presses: Arc<Mutex<VecDeque<()>>>,
}

impl MockButton {
    pub fn press(&self) {
        locked(&self.presses).push_back(());
    }
}

impl Button for MockButton {
    fn was_pressed(&mut self) -> bool {
        locked(&self.presses).pop_front().is_some()
    }
}

/// Fixed network association answer.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    pub associated: bool,
}

impl NetworkStatus for MockNetwork {
    fn is_associated(&self) -> bool {
        self.associated
    }
}

/// Command handler that records every raw command string it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    commands: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    pub fn commands(&self) -> Vec<String> {
        locked(&self.commands).clone()
    }
}

impl CommandHandler for RecordingHandler {
    fn handle_command(&mut self, command: &str) {
        locked(&self.commands).push(command.to_string());
    }
}

struct MockLinkState {
    /// Scripted per-attempt connect results, front first. When the script
    /// runs out, `default_connect` answers.
    connect_script: VecDeque<Result<(), LinkError>>,
    default_connect: Result<(), LinkError>,
    connect_attempts: usize,
    subscriptions: Vec<String>,
    published: Vec<(String, Vec<u8>)>,
    inbound: VecDeque<LinkEvent>,
}

/// Broker link driven entirely by a script, no network involved.
#[derive(Clone)]
pub struct MockLink {
    state: Arc<Mutex<MockLinkState>>,
}

impl MockLink {
    fn with_default(default_connect: Result<(), LinkError>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockLinkState {
                connect_script: VecDeque::new(),
                default_connect,
                connect_attempts: 0,
                subscriptions: Vec::new(),
                published: Vec::new(),
                inbound: VecDeque::new(),
            })),
        }
    }

    /// Every connect attempt succeeds.
    pub fn accepting() -> Self {
        Self::with_default(Ok(()))
    }

    /// Every connect attempt fails.
    pub fn rejecting() -> Self {
        Self::with_default(Err(LinkError::ConnectionRefused(
            "mock refusal".to_string(),
        )))
    }

    /// The first `n` connect attempts fail, the rest succeed.
    pub fn rejecting_first(n: usize) -> Self {
        let link = Self::accepting();
        {
            let mut state = locked(&link.state);
            for _ in 0..n {
                state
                    .connect_script
                    .push_back(Err(LinkError::ConnectionRefused("mock refusal".to_string())));
            }
        }
        link
    }

    pub fn connect_attempts(&self) -> usize {
        locked(&self.state).connect_attempts
    }

    pub fn subscriptions(&self) -> Vec<String> {
        locked(&self.state).subscriptions.clone()
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        locked(&self.state).published.clone()
    }

    /// Queue an inbound message for the next `poll`.
    pub fn queue_inbound(&self, topic: &str, payload: &[u8]) {
        locked(&self.state).inbound.push_back(LinkEvent::Message {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
    }

    /// Queue a session drop for the next `poll`.
    pub fn queue_disconnect(&self) {
        locked(&self.state).inbound.push_back(LinkEvent::Disconnected);
    }
}

#[async_trait]
impl BrokerLink for MockLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        let mut state = locked(&self.state);
        state.connect_attempts += 1;
        state
            .connect_script
            .pop_front()
            .unwrap_or_else(|| state.default_connect.clone())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError> {
        locked(&self.state).subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        locked(&self.state)
            .published
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn poll(&mut self) -> LinkEvent {
        locked(&self.state)
            .inbound
            .pop_front()
            .unwrap_or(LinkEvent::Idle)
    }
}
