//! Mock restaurant lookup returning a fixed candidate list.
//!
//! Used in tests and local development where no Places API key exists.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RestaurantId, SearchArea};
use crate::domain::restaurant::Restaurant;
use crate::ports::RestaurantLookup;

/// Lookup that fabricates a fixed number of candidates around the area.
pub struct MockRestaurantLookup {
    candidates: usize,
}

impl MockRestaurantLookup {
    /// Creates a lookup producing `candidates` restaurants per call.
    pub fn new(candidates: usize) -> Self {
        Self { candidates }
    }
}

impl Default for MockRestaurantLookup {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl RestaurantLookup for MockRestaurantLookup {
    async fn find_or_create_nearby(
        &self,
        area: &SearchArea,
    ) -> Result<Vec<Restaurant>, DomainError> {
        Ok((0..self.candidates)
            .map(|i| Restaurant {
                id: RestaurantId::new(),
                name: format!("Mock Restaurant {}", i + 1),
                latitude: area.latitude(),
                longitude: area.longitude(),
                place_ref: format!("mock-place-{}", i + 1),
            })
            .collect())
    }
}
