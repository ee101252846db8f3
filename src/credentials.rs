//! Stored-secret loading for the broker token and network credentials.
//!
//! Loading never fails: any read or parse problem is logged and yields empty
//! fields. Validation is a separate step so startup can report one clear,
//! distinguishable message per missing credential before refusing to run.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// The three stored secrets. An empty string means the field was absent.
///
/// Field names follow the stored file format of the credentials JSON.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "beebotteToken", default)]
    pub mqtt_token: String,
    #[serde(rename = "WifiSSID", default)]
    pub wifi_ssid: String,
    #[serde(rename = "WifiPassword", default)]
    pub wifi_password: String,
}

/// Fatal startup conditions: the device must not proceed to network or
/// messaging initialization without these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("MQTT token not present in credentials file")]
    MissingMqttToken,
    #[error("WiFi credentials not present in credentials file")]
    MissingWifiCredentials,
}

impl Credentials {
    /// Read and decode the credentials file. Returns empty fields (never an
    /// error) when the file is missing or malformed.
    pub fn load(path: &Path) -> Credentials {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read credentials file");
                return Credentials::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(credentials) => {
                info!(path = %path.display(), "credentials loaded");
                credentials
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse credentials file");
                Credentials::default()
            }
        }
    }

    /// Check the fatal-precondition invariant: a usable broker token and a
    /// usable network identifier/secret pair.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.mqtt_token.is_empty() {
            return Err(CredentialError::MissingMqttToken);
        }
        if self.wifi_ssid.is_empty() || self.wifi_password.is_empty() {
            return Err(CredentialError::MissingWifiCredentials);
        }
        Ok(())
    }
}
