//! Push notification (FCM) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Push notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// FCM server key. Optional: without it invites are logged only.
    pub fcm_server_key: Option<Secret<String>>,

    /// Base URL for the FCM API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NotificationConfig {
    /// Get the server key if configured
    pub fn fcm_server_key(&self) -> Option<&str> {
        self.fcm_server_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.fcm_server_key() {
            if key.is_empty() {
                return Err(ValidationError::MissingRequired("FCM_SERVER_KEY"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            fcm_server_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_config_defaults() {
        let config = NotificationConfig::default();
        assert!(config.fcm_server_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_key() {
        let config = NotificationConfig {
            fcm_server_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
