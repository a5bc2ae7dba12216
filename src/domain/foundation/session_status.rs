//! SessionStatus enum for tracking lifecycle of matching sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a matching session.
///
/// Transitions move forward only; a completed session never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Created,
    Matching,
    Completed,
}

impl SessionStatus {
    /// Returns true if the session can still be modified.
    pub fn is_mutable(&self) -> bool {
        !matches!(self, SessionStatus::Completed)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Created -> Matching (swiping begins)
    /// - Matching -> Completed (finalization)
    /// - Created -> Completed (finalization before any swiping)
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Created, Matching) | (Matching, Completed) | (Created, Completed)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Created => "CREATED",
            SessionStatus::Matching => "MATCHING",
            SessionStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}
