//! Typed configuration for the controller.
//!
//! The device topology is fixed — one broker, one command topic — so every
//! field carries a default and a config file is optional. The credentials
//! file itself is separate (see [`crate::credentials`]); the config only
//! points at it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GadgetConfig {
    #[serde(default)]
    pub mqtt: MqttSection,
    #[serde(default)]
    pub gadget: GadgetSection,
}

/// Broker topology. Defaults encode the device's fixed broker and topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MqttSection {
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    /// The single inbound command topic.
    #[serde(default = "default_command_topic")]
    pub command_topic: String,
    /// Per-attempt connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for MqttSection {
    fn default() -> Self {
        Self {
            broker_host: default_broker_host(),
            broker_port: default_broker_port(),
            command_topic: default_command_topic(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Local device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GadgetSection {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Idle delay between control-loop iterations in milliseconds.
    #[serde(default = "default_loop_delay_ms")]
    pub loop_delay_ms: u64,
}

impl Default for GadgetSection {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            loop_delay_ms: default_loop_delay_ms(),
        }
    }
}

fn default_broker_host() -> String {
    "mqtt.beebotte.com".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

fn default_command_topic() -> String {
    "VRGadget/command".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_loop_delay_ms() -> u64 {
    100
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to render TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),
}

impl GadgetConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from an explicit path, or probe default locations, or fall back
    /// to the built-in defaults when no file exists anywhere.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        for candidate in ["vrgadget.toml", "config/vrgadget.toml"] {
            let candidate = Path::new(candidate);
            if candidate.exists() {
                return Self::load_from_file(candidate);
            }
        }

        Ok(Self::default())
    }
}
