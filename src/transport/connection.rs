//! Pure connection state and retry policy for the MQTT transport.

use super::link::LinkError;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle of the broker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Retry budget exhausted. The transport stays down and the device runs
    /// manual-only until restarted.
    GivenUp,
}

/// Bounded-retry reconnection policy: a hard attempt cap with a fixed wait
/// after each failure. Deliberately not exponential backoff — this is a
/// single always-on device, not a multi-client service.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Worst-case wall-clock time a full reconnect sequence spends waiting
    /// between attempts. The control loop's latency bound while a blocking
    /// reconnect runs.
    pub fn max_total_wait(&self) -> Duration {
        self.retry_delay * self.max_attempts
    }
}

/// Transport-level errors surfaced to startup.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The network link is not associated; no connection was attempted.
    #[error("network not ready")]
    NetworkNotReady,

    #[error("broker connection retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("link error: {0}")]
    Link(#[from] LinkError),
}

/// Pseudo-random client identifier, fresh for every connection attempt so a
/// stale half-open session on the broker never collides with the new one.
pub fn random_client_id() -> String {
    format!("vrgadget-{}", uuid::Uuid::new_v4().simple())
}
