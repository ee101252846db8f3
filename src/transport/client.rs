//! Broker transport with bounded reconnection.
//!
//! [`MqttTransport`] owns the connection lifecycle: a bounded retry cycle of
//! five attempts spaced five seconds apart, after which the transport gives
//! up and the gadget keeps running on button control alone. Inbound command
//! payloads are unwrapped here and forwarded to the registered
//! [`CommandHandler`].

use super::connection::{ConnectionState, RetryPolicy, TransportError};
use super::link::{BrokerLink, LinkEvent};
use crate::command::CommandHandler;
use crate::net::NetworkStatus;
use serde::Deserialize;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Upper bound on inbound events drained per service tick. Keeps one tick
/// from starving the button poll under a message flood.
const EVENTS_PER_TICK: usize = 16;

/// Wire shape of a command message: `{"data": "<command>"}`.
#[derive(Debug, Deserialize)]
struct CommandPayload {
    #[serde(default)]
    data: Option<String>,
}

enum AttemptOutcome {
    Connected,
    Failed,
    GaveUp,
}

pub struct MqttTransport<L: BrokerLink> {
    link: L,
    command_topic: String,
    state: ConnectionState,
    retry: RetryPolicy,
    attempts: u32,
    next_attempt_at: Option<Instant>,
    handler: Option<Box<dyn CommandHandler>>,
    network: Arc<dyn NetworkStatus>,
}

impl<L: BrokerLink> MqttTransport<L> {
    pub fn new(link: L, command_topic: &str, network: Arc<dyn NetworkStatus>) -> Self {
        Self {
            link,
            command_topic: command_topic.to_string(),
            state: ConnectionState::Disconnected,
            retry: RetryPolicy::default(),
            attempts: 0,
            next_attempt_at: None,
            handler: None,
            network,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Register the handler that receives inbound commands. A second call
    /// replaces the first; the transport holds exactly one.
    pub fn register_handler(&mut self, handler: Box<dyn CommandHandler>) {
        self.handler = Some(handler);
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn has_given_up(&self) -> bool {
        self.state == ConnectionState::GivenUp
    }

    /// Bring the transport up for the first time. Requires network
    /// association; then runs the full bounded retry cycle.
    pub async fn start(&mut self) -> Result<(), TransportError> {
        if !self.network.is_associated() {
            return Err(TransportError::NetworkNotReady);
        }
        self.reconnect().await
    }

    /// Run the retry cycle to completion: attempt, wait `retry_delay`,
    /// repeat until connected or the attempt budget is spent.
    pub async fn reconnect(&mut self) -> Result<(), TransportError> {
        loop {
            match self.try_connect_once().await {
                AttemptOutcome::Connected => return Ok(()),
                AttemptOutcome::GaveUp => {
                    return Err(TransportError::RetriesExhausted {
                        attempts: self.retry.max_attempts,
                    });
                }
                AttemptOutcome::Failed => {
                    tokio::time::sleep(self.retry.retry_delay).await;
                }
            }
        }
    }

    /// One non-blocking slice of transport work. Connected: drain a bounded
    /// batch of inbound events. Disconnected: make at most one connection
    /// attempt, and only once the retry delay has elapsed. Given up: nothing.
    pub async fn service_tick(&mut self) {
        match self.state {
            ConnectionState::GivenUp => {}
            ConnectionState::Connected => self.drain_events().await,
            ConnectionState::Disconnected | ConnectionState::Connecting => {
                if let Some(deadline) = self.next_attempt_at {
                    if Instant::now() < deadline {
                        return;
                    }
                }
                self.try_connect_once().await;
            }
        }
    }

    /// Publish to a topic. When the transport is not connected this is a
    /// warn-and-drop, not an error; command flow never depends on it.
    pub async fn publish(&mut self, topic: &str, payload: &[u8]) {
        if !self.is_connected() {
            warn!(topic, "dropping publish while disconnected");
            return;
        }
        if let Err(e) = self.link.publish(topic, payload).await {
            warn!(topic, error = %e, "publish failed");
        }
    }

    async fn try_connect_once(&mut self) -> AttemptOutcome {
        if self.attempts >= self.retry.max_attempts {
            warn!(
                attempts = self.attempts,
                "connection attempts exhausted, giving up on remote control"
            );
            self.state = ConnectionState::GivenUp;
            return AttemptOutcome::GaveUp;
        }

        self.attempts += 1;
        self.state = ConnectionState::Connecting;
        debug!(
            attempt = self.attempts,
            max = self.retry.max_attempts,
            "connecting to broker"
        );

        match self.link.connect().await {
            Ok(()) => {
                if let Err(e) = self.link.subscribe(&self.command_topic).await {
                    warn!(topic = %self.command_topic, error = %e, "subscribe failed");
                    self.state = ConnectionState::Disconnected;
                    self.next_attempt_at = Some(Instant::now() + self.retry.retry_delay);
                    return AttemptOutcome::Failed;
                }
                info!(topic = %self.command_topic, "connected and subscribed");
                self.state = ConnectionState::Connected;
                self.attempts = 0;
                self.next_attempt_at = None;
                AttemptOutcome::Connected
            }
            Err(e) => {
                warn!(
                    attempt = self.attempts,
                    max = self.retry.max_attempts,
                    error = %e,
                    "connection attempt failed"
                );
                self.state = ConnectionState::Disconnected;
                self.next_attempt_at = Some(Instant::now() + self.retry.retry_delay);
                AttemptOutcome::Failed
            }
        }
    }

    async fn drain_events(&mut self) {
        for _ in 0..EVENTS_PER_TICK {
            match self.link.poll().await {
                LinkEvent::Idle => break,
                LinkEvent::Disconnected => {
                    warn!("broker session lost, entering retry cycle");
                    self.state = ConnectionState::Disconnected;
                    self.next_attempt_at = Some(Instant::now() + self.retry.retry_delay);
                    break;
                }
                LinkEvent::Message { topic, payload } => {
                    self.handle_message(&topic, &payload);
                }
            }
        }
    }

    fn handle_message(&mut self, topic: &str, payload: &[u8]) {
        let Some(command) = parse_command_payload(payload) else {
            return;
        };
        debug!(topic, command = %command, "command received");
        match &mut self.handler {
            Some(handler) => handler.handle_command(&command),
            None => warn!(command = %command, "no command handler registered"),
        }
    }
}

/// Unwrap the `data` field from a command message. Malformed JSON, a missing
/// field, or an empty string all return `None`; a bad payload never takes the
/// connection down.
pub fn parse_command_payload(payload: &[u8]) -> Option<String> {
    let parsed: CommandPayload = match serde_json::from_slice(payload) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "discarding malformed command payload");
            return None;
        }
    };
    match parsed.data {
        Some(data) if !data.is_empty() => Some(data),
        Some(_) => {
            warn!("discarding command payload with empty data field");
            None
        }
        None => {
            warn!("discarding command payload without data field");
            None
        }
    }
}
