//! GetSessionHandler - Query handler for fetching one session.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

/// Query for a single session by id.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for fetching sessions.
pub struct GetSessionHandler {
    sessions: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, SessionError> {
        self.sessions
            .find_by_id(&query.session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(query.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::foundation::{JoinCode, SearchArea, UserId};

    #[tokio::test]
    async fn returns_stored_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = Session::new(
            SessionId::new(),
            UserId::new(),
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("AB12C").unwrap(),
            vec![],
        );
        store.insert(&session).await.unwrap();

        let handler = GetSessionHandler::new(store);
        let found = handler
            .handle(GetSessionQuery {
                session_id: *session.id(),
            })
            .await
            .unwrap();

        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn missing_session_fails_with_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionStore::new()));

        let result = handler
            .handle(GetSessionQuery {
                session_id: SessionId::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }
}
