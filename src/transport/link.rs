//! Broker session seam.
//!
//! [`BrokerLink`] is the one place the transport touches the network, which
//! lets the retry policy and inbound routing run against a scripted mock in
//! tests. [`RumqttcLink`] is the production implementation.

use super::connection::random_client_id;
use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// How long one service-tick poll may wait for broker activity.
const POLL_BUDGET: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("broker refused connection: {0}")]
    ConnectionRefused(String),
    #[error("connection attempt timed out")]
    ConnectTimeout,
    #[error("broker i/o error: {0}")]
    Io(String),
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

/// One poll step worth of broker activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Inbound message on a subscribed topic.
    Message { topic: String, payload: Vec<u8> },
    /// The session dropped; the transport re-enters its retry cycle.
    Disconnected,
    /// Nothing pending this tick.
    Idle,
}

/// A publish/subscribe session to the broker.
#[async_trait]
pub trait BrokerLink: Send {
    /// Establish a fresh session: new pseudo-random client id, token as
    /// username with an empty password, resolved on ConnAck.
    async fn connect(&mut self) -> Result<(), LinkError>;

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError>;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError>;

    /// Service the session without blocking the caller's loop.
    async fn poll(&mut self) -> LinkEvent;
}

/// rumqttc-backed broker session.
pub struct RumqttcLink {
    host: String,
    port: u16,
    token: String,
    connect_timeout: Duration,
    session: Option<(AsyncClient, EventLoop)>,
}

impl RumqttcLink {
    pub fn new(host: &str, port: u16, token: &str, connect_timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            token: token.to_string(),
            connect_timeout,
            session: None,
        }
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(random_client_id(), &self.host, self.port);
        // The broker authenticates on a token in the username slot.
        options.set_credentials(&self.token, "");
        options.set_keep_alive(Duration::from_secs(60));
        options
    }
}

#[async_trait]
impl BrokerLink for RumqttcLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        // A fresh client and event loop per attempt; a failed half-open
        // session is dropped wholesale rather than resumed.
        let (client, mut event_loop) = AsyncClient::new(self.options(), 10);

        let outcome = tokio::time::timeout(self.connect_timeout, async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                        if ack.code == ConnectReturnCode::Success {
                            return Ok(());
                        }
                        return Err(LinkError::ConnectionRefused(format!("{:?}", ack.code)));
                    }
                    Ok(_) => continue,
                    Err(e) => return Err(LinkError::Io(e.to_string())),
                }
            }
        })
        .await;

        match outcome {
            Ok(Ok(())) => {
                self.session = Some((client, event_loop));
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(LinkError::ConnectTimeout),
        }
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError> {
        let Some((client, _)) = &self.session else {
            return Err(LinkError::Io("no active session".to_string()));
        };
        client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| LinkError::SubscribeFailed(e.to_string()))
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        let Some((client, _)) = &self.session else {
            return Err(LinkError::PublishFailed("no active session".to_string()));
        };
        client
            .publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
            .await
            .map_err(|e| LinkError::PublishFailed(e.to_string()))
    }

    async fn poll(&mut self) -> LinkEvent {
        let Some((_, event_loop)) = &mut self.session else {
            return LinkEvent::Disconnected;
        };

        match tokio::time::timeout(POLL_BUDGET, event_loop.poll()).await {
            Err(_) => LinkEvent::Idle,
            Ok(Ok(Event::Incoming(Packet::Publish(publish)))) => {
                debug!(topic = %publish.topic, "inbound publish");
                LinkEvent::Message {
                    topic: publish.topic.clone(),
                    payload: publish.payload.to_vec(),
                }
            }
            Ok(Ok(Event::Incoming(Packet::Disconnect))) => {
                self.session = None;
                LinkEvent::Disconnected
            }
            Ok(Ok(_)) => LinkEvent::Idle,
            Ok(Err(e)) => {
                warn!(error = %e, "broker session error");
                self.session = None;
                LinkEvent::Disconnected
            }
        }
    }
}
