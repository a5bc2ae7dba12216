//! Shared domain value objects and error types.

mod errors;
mod ids;
mod join_code;
mod location;
mod session_status;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{RestaurantId, SessionId, UserId};
pub use join_code::{JoinCode, JOIN_CODE_LENGTH};
pub use location::SearchArea;
pub use session_status::SessionStatus;
pub use timestamp::Timestamp;
