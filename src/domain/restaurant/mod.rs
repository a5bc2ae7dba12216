//! Restaurant record shape, as returned by the restaurant lookup collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::RestaurantId;

/// One restaurant candidate near a session's search area.
///
/// Restaurants are created by the lookup collaborator; sessions reference
/// them by id and keep per-session vote tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Identifier in the external place provider, for deduplication.
    pub place_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_round_trip() {
        let restaurant = Restaurant {
            id: RestaurantId::new(),
            name: "Noodle House".to_string(),
            latitude: 49.28,
            longitude: -123.12,
            place_ref: "place-abc".to_string(),
        };
        let json = serde_json::to_string(&restaurant).unwrap();
        let restored: Restaurant = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, restaurant);
    }
}
