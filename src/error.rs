//! Top-level error type for controller startup and operation.
//!
//! Only configuration-category errors (missing credentials, unreadable
//! config) are fatal; connectivity and protocol problems are absorbed by the
//! transport and never reach this type from the running control loop.

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GadgetError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("hardware error: {0}")]
    Hardware(String),
}

/// Result type for controller operations.
pub type GadgetResult<T> = Result<T, GadgetError>;
