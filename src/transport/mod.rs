//! MQTT transport for remote commands.
//!
//! The module is split to keep retry policy testable without a broker:
//!
//! - [`connection`] - Pure connection state, retry policy, and errors
//! - [`link`] - The broker session seam ([`link::BrokerLink`]) and its
//!   rumqttc implementation
//! - [`client`] - The transport itself: bounded-retry reconnection, the
//!   non-blocking service tick, publish, and inbound command forwarding

pub mod client;
pub mod connection;
pub mod link;

pub use client::MqttTransport;
pub use connection::{ConnectionState, RetryPolicy, TransportError};
pub use link::{BrokerLink, LinkError, LinkEvent, RumqttcLink};
