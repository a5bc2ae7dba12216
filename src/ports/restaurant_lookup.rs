//! Restaurant lookup port.
//!
//! Given a search area, returns the restaurant candidates a new session will
//! vote on, creating restaurant records as needed on the collaborator side.

use crate::domain::foundation::{DomainError, SearchArea};
use crate::domain::restaurant::Restaurant;
use async_trait::async_trait;

/// Port for the external restaurant search collaborator.
#[async_trait]
pub trait RestaurantLookup: Send + Sync {
    /// Find restaurants near the area, creating records for newly seen ones.
    ///
    /// # Errors
    ///
    /// - `DependencyError` on provider failure; session creation aborts
    async fn find_or_create_nearby(
        &self,
        area: &SearchArea,
    ) -> Result<Vec<Restaurant>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restaurant_lookup_is_object_safe() {
        fn _accepts_dyn(_lookup: &dyn RestaurantLookup) {}
    }
}
