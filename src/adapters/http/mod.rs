//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod session;
pub mod user;

pub use session::{session_routes, SessionHandlers};
pub use user::{user_routes, UserHandlers};
