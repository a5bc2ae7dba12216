//! Session module: the group matching aggregate and its errors.

mod aggregate;
mod errors;

pub use aggregate::{
    FinalSelection, Participant, RestaurantTally, Session, Swipe, MIN_VOTES_FOR_SELECTION,
    SESSION_TTL_MINUTES,
};
pub use errors::SessionError;
