//! MarkDoneSwipingHandler - Command handler for the done-swiping flag.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

use super::mutate::mutate_session;

/// Command flagging a participant as finished swiping.
#[derive(Debug, Clone)]
pub struct MarkDoneSwipingCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Handler for the done-swiping flag.
pub struct MarkDoneSwipingHandler {
    sessions: Arc<dyn SessionStore>,
}

impl MarkDoneSwipingHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: MarkDoneSwipingCommand) -> Result<Session, SessionError> {
        let session = mutate_session(&self.sessions, &cmd.session_id, |s| {
            s.mark_done_swiping(&cmd.user_id)
        })
        .await?;

        tracing::info!(
            operation = "mark_done_swiping",
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            "participant finished swiping"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::foundation::{JoinCode, SearchArea};

    #[tokio::test]
    async fn marks_participant_done() {
        let store = Arc::new(InMemorySessionStore::new());
        let creator_id = UserId::new();
        let session = Session::new(
            SessionId::new(),
            creator_id,
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("D0NE1").unwrap(),
            vec![],
        );
        let session_id = *session.id();
        store.insert(&session).await.unwrap();

        let handler = MarkDoneSwipingHandler::new(store);
        let session = handler
            .handle(MarkDoneSwipingCommand {
                session_id,
                user_id: creator_id,
            })
            .await
            .unwrap();

        assert!(session.participants()[0].is_done_swiping());
    }

    #[tokio::test]
    async fn non_participant_fails() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = Session::new(
            SessionId::new(),
            UserId::new(),
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("D0NE2").unwrap(),
            vec![],
        );
        let session_id = *session.id();
        store.insert(&session).await.unwrap();

        let handler = MarkDoneSwipingHandler::new(store);
        let result = handler
            .handle(MarkDoneSwipingCommand {
                session_id,
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::ParticipantNotFound)));
    }
}
