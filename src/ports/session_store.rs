//! Session store port.
//!
//! Defines the contract for persisting and retrieving Session aggregates.
//! Implementations handle the actual database operations.
//!
//! # Concurrency
//!
//! - `insert` must enforce join-code uniqueness among non-completed sessions
//!   and reject duplicates, closing the check-then-insert race.
//! - `update` is a conditional (compare-and-swap) write on the aggregate's
//!   version token so concurrent invites/votes never lose updates.

use crate::domain::foundation::{DomainError, JoinCode, SessionId, UserId};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// - `DuplicateJoinCode` if a non-completed session already holds the code
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, session: &Session) -> Result<(), DomainError>;

    /// Conditionally update an existing session.
    ///
    /// Persists only if the stored version equals `session.version()`, and
    /// returns the bumped version token on success.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `ConcurrentModification` if the version check fails
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<i64, DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Find the non-completed session holding this join code, if any.
    ///
    /// Completed sessions release their codes for reuse.
    async fn find_active_by_join_code(
        &self,
        code: &JoinCode,
    ) -> Result<Option<Session>, DomainError>;

    /// Find all non-completed sessions created by a user, newest first.
    async fn find_active_by_creator(
        &self,
        creator: &UserId,
    ) -> Result<Vec<Session>, DomainError>;

    /// Delete a session (primarily for testing).
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
