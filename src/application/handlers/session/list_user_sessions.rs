//! ListUserSessionsHandler - Query handler for a creator's active sessions.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

/// Query for the non-completed sessions a user created.
#[derive(Debug, Clone)]
pub struct ListUserSessionsQuery {
    pub user_id: UserId,
}

/// Handler for listing a user's sessions.
pub struct ListUserSessionsHandler {
    sessions: Arc<dyn SessionStore>,
}

impl ListUserSessionsHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Returns non-completed sessions created by the user, newest first.
    pub async fn handle(&self, query: ListUserSessionsQuery) -> Result<Vec<Session>, SessionError> {
        self.sessions
            .find_active_by_creator(&query.user_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    operation = "list_user_sessions",
                    user_id = %query.user_id,
                    error = %e,
                    "session fetch failed"
                );
                SessionError::infrastructure(e.to_string())
            })
    }
}
