//! Search area value object: the geographic anchor of a session.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Geographic circle a session searches for restaurants in.
///
/// Immutable once a session is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchArea {
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
}

impl SearchArea {
    /// Creates a search area, validating coordinate and radius ranges.
    pub fn new(latitude: f64, longitude: f64, radius_meters: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::out_of_range(
                "latitude", -90.0, 90.0, latitude,
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::out_of_range(
                "longitude", -180.0, 180.0, longitude,
            ));
        }
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(ValidationError::invalid_format(
                "radius",
                "must be a positive number of meters",
            ));
        }
        Ok(Self {
            latitude,
            longitude,
            radius_meters,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Search radius in meters.
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}
