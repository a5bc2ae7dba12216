//! Google Places implementation of RestaurantLookup.
//!
//! Queries the Places Nearby Search API for restaurants around a session's
//! search area and materializes a restaurant record per result. Record
//! creation/deduplication by `place_ref` happens on the restaurant side of
//! the system, not in the session core.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, RestaurantId, SearchArea};
use crate::domain::restaurant::Restaurant;
use crate::ports::RestaurantLookup;

/// Configuration for the Google Places lookup.
#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://maps.googleapis.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GooglePlacesConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://maps.googleapis.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Google Places implementation of the restaurant lookup collaborator.
pub struct GooglePlacesLookup {
    config: GooglePlacesConfig,
    client: Client,
}

impl GooglePlacesLookup {
    /// Creates a new lookup with the given configuration.
    pub fn new(config: GooglePlacesConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DependencyError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/maps/api/place/nearbysearch/json",
            self.config.base_url
        )
    }
}

#[async_trait]
impl RestaurantLookup for GooglePlacesLookup {
    async fn find_or_create_nearby(
        &self,
        area: &SearchArea,
    ) -> Result<Vec<Restaurant>, DomainError> {
        let location = format!("{},{}", area.latitude(), area.longitude());
        let radius = format!("{}", area.radius_meters());

        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "restaurant"),
                ("key", self.config.api_key()),
            ])
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DependencyError,
                    format!("Places request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::DependencyError,
                format!("Places request returned HTTP {}", response.status()),
            ));
        }

        let body: NearbySearchResponse = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DependencyError,
                format!("Places response parse failed: {}", e),
            )
        })?;

        // ZERO_RESULTS is a valid empty answer, not a failure.
        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            return Err(DomainError::new(
                ErrorCode::DependencyError,
                format!("Places request rejected: {}", body.status),
            ));
        }

        tracing::debug!(
            operation = "find_or_create_nearby",
            results = body.results.len(),
            "places lookup completed"
        );

        Ok(body
            .results
            .into_iter()
            .map(|place| Restaurant {
                id: RestaurantId::new(),
                name: place.name,
                latitude: place.geometry.location.lat,
                longitude: place.geometry.location.lng,
                place_ref: place.place_id,
            })
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
