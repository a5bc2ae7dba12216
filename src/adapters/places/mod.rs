//! Restaurant lookup adapters.

mod google_places;
mod mock;

pub use google_places::{GooglePlacesConfig, GooglePlacesLookup};
pub use mock::MockRestaurantLookup;
