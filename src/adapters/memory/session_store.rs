//! In-memory implementation of SessionStore.
//!
//! Backs handler and integration tests; mirrors the postgres adapter's
//! contract including join-code uniqueness and version-checked updates.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, JoinCode, SessionId, SessionStatus, UserId,
};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// True if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();

        let code_taken = sessions.values().any(|s| {
            s.join_code() == session.join_code() && s.status() != SessionStatus::Completed
        });
        if code_taken {
            return Err(DomainError::new(
                ErrorCode::DuplicateJoinCode,
                format!("Join code already in use: {}", session.join_code()),
            ));
        }

        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<i64, DomainError> {
        let mut sessions = self.sessions.lock().unwrap();

        let stored = sessions.get_mut(session.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;

        if stored.version() != session.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Version mismatch for session {}: stored {}, given {}",
                    session.id(),
                    stored.version(),
                    session.version()
                ),
            ));
        }

        let new_version = session.version() + 1;
        *stored = session.clone();
        stored.set_version(new_version);
        Ok(new_version)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn find_active_by_join_code(
        &self,
        code: &JoinCode,
    ) -> Result<Option<Session>, DomainError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.join_code() == code && s.status() != SessionStatus::Completed)
            .cloned())
    }

    async fn find_active_by_creator(
        &self,
        creator: &UserId,
    ) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.creator() == creator && s.status() != SessionStatus::Completed)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(sessions)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", id),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SearchArea;

    fn test_session_with_code(code: &str) -> Session {
        Session::new(
            SessionId::new(),
            UserId::new(),
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse(code).unwrap(),
            vec![],
        )
    }

    #[tokio::test]
    async fn insert_and_find_round_trips() {
        let store = InMemorySessionStore::new();
        let session = test_session_with_code("AAA11");

        store.insert(&session).await.unwrap();
        let found = store.find_by_id(session.id()).await.unwrap().unwrap();

        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_active_join_code() {
        let store = InMemorySessionStore::new();
        store.insert(&test_session_with_code("AAA11")).await.unwrap();

        let result = store.insert(&test_session_with_code("AAA11")).await;

        assert!(matches!(
            result,
            Err(DomainError { code: ErrorCode::DuplicateJoinCode, .. })
        ));
    }

    #[tokio::test]
    async fn completed_session_releases_its_join_code() {
        let store = InMemorySessionStore::new();
        let mut completed = test_session_with_code("AAA11");
        completed.finalize().unwrap();
        store.insert(&completed).await.unwrap();

        assert!(store
            .find_active_by_join_code(completed.join_code())
            .await
            .unwrap()
            .is_none());
        assert!(store.insert(&test_session_with_code("AAA11")).await.is_ok());
    }

    #[tokio::test]
    async fn update_checks_version() {
        let store = InMemorySessionStore::new();
        let mut session = test_session_with_code("AAA11");
        store.insert(&session).await.unwrap();

        let new_version = store.update(&session).await.unwrap();
        assert_eq!(new_version, session.version() + 1);

        // Stale token now fails.
        let result = store.update(&session).await;
        assert!(matches!(
            result,
            Err(DomainError { code: ErrorCode::ConcurrentModification, .. })
        ));

        session.set_version(new_version);
        assert!(store.update(&session).await.is_ok());
    }

    #[tokio::test]
    async fn find_active_by_creator_orders_newest_first_and_skips_completed() {
        let store = InMemorySessionStore::new();
        let creator = UserId::new();

        let mut first = test_session_with_code("AAA11");
        let mut second = test_session_with_code("BBB22");
        let mut done = test_session_with_code("CCC33");
        // Same creator across all three.
        first = Session::reconstitute(
            *first.id(),
            first.join_code().clone(),
            creator,
            *first.area(),
            first.status(),
            first.participants().to_vec(),
            vec![],
            first.restaurants().to_vec(),
            None,
            *first.created_at(),
            *first.expires_at(),
            first.version(),
        );
        second = Session::reconstitute(
            *second.id(),
            second.join_code().clone(),
            creator,
            *second.area(),
            second.status(),
            second.participants().to_vec(),
            vec![],
            second.restaurants().to_vec(),
            None,
            second.created_at().plus_secs(10),
            *second.expires_at(),
            second.version(),
        );
        done.finalize().unwrap();
        done = Session::reconstitute(
            *done.id(),
            done.join_code().clone(),
            creator,
            *done.area(),
            done.status(),
            done.participants().to_vec(),
            vec![],
            done.restaurants().to_vec(),
            None,
            *done.created_at(),
            *done.expires_at(),
            done.version(),
        );

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();
        store.insert(&done).await.unwrap();

        let active = store.find_active_by_creator(&creator).await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id(), second.id());
        assert_eq!(active[1].id(), first.id());
    }

    #[tokio::test]
    async fn delete_missing_session_fails() {
        let store = InMemorySessionStore::new();
        assert!(store.delete(&SessionId::new()).await.is_err());
    }
}
