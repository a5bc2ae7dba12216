//! Restaurant lookup (Google Places) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Restaurant lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesConfig {
    /// Google Places API key. Optional: without it the mock lookup is wired.
    pub api_key: Option<Secret<String>>,

    /// Base URL for the Places API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Candidates the mock lookup fabricates when no API key is set
    #[serde(default = "default_mock_candidates")]
    pub mock_candidates: usize,
}

impl PlacesConfig {
    /// Get the API key if configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate places configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.api_key() {
            if key.is_empty() {
                return Err(ValidationError::MissingRequired("PLACES_API_KEY"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            mock_candidates: default_mock_candidates(),
        }
    }
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_mock_candidates() -> usize {
    5
}
