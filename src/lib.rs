//! BiteSwipe - Group Restaurant Matching Backend
//!
//! Implements the session lifecycle behind group restaurant matching: a user
//! anchors a session at a location, invites participants, everyone swipes on
//! nearby restaurants, and the session concludes with a winning restaurant.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
