//! FinalizeSessionHandler - Command handler for closing voting.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

use super::mutate::mutate_session;

/// Command finalizing a session's result.
#[derive(Debug, Clone)]
pub struct FinalizeSessionCommand {
    pub session_id: SessionId,
}

/// Handler for finalizing sessions.
pub struct FinalizeSessionHandler {
    sessions: Arc<dyn SessionStore>,
}

impl FinalizeSessionHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: FinalizeSessionCommand) -> Result<Session, SessionError> {
        let session = mutate_session(&self.sessions, &cmd.session_id, |s| {
            s.finalize().map(|_| ())
        })
        .await?;

        match session.final_selection() {
            Some(selection) => tracing::info!(
                operation = "finalize_session",
                session_id = %cmd.session_id,
                restaurant_id = %selection.restaurant_id,
                "session finalized"
            ),
            None => tracing::info!(
                operation = "finalize_session",
                session_id = %cmd.session_id,
                "session finalized without votes"
            ),
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::foundation::{JoinCode, RestaurantId, SearchArea, SessionStatus, UserId};

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        handler: FinalizeSessionHandler,
        session_id: SessionId,
        creator_id: UserId,
        r1: RestaurantId,
        r2: RestaurantId,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(InMemorySessionStore::new());
        let creator_id = UserId::new();
        let r1 = RestaurantId::new();
        let r2 = RestaurantId::new();

        let session = Session::new(
            SessionId::new(),
            creator_id,
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("F1NAL").unwrap(),
            vec![r1, r2],
        );
        let session_id = *session.id();
        store.insert(&session).await.unwrap();

        Fixture {
            store: store.clone(),
            handler: FinalizeSessionHandler::new(store),
            session_id,
            creator_id,
            r1,
            r2,
        }
    }

    async fn cast_votes(fx: &Fixture, restaurant: RestaurantId, total: u32, positive: u32) {
        let mut session = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();
        for i in 0..total {
            session
                .record_swipe(&fx.creator_id, &restaurant, i < positive)
                .unwrap();
        }
        let v = fx.store.update(&session).await.unwrap();
        session.set_version(v);
    }

    #[tokio::test]
    async fn finalize_selects_eligible_restaurant_with_best_ratio() {
        let fx = setup().await;
        cast_votes(&fx, fx.r1, 4, 3).await;
        cast_votes(&fx, fx.r2, 1, 1).await;

        let session = fx
            .handler
            .handle(FinalizeSessionCommand {
                session_id: fx.session_id,
            })
            .await
            .unwrap();

        // r2's perfect ratio sits below the minimum sample size.
        assert_eq!(session.final_selection().unwrap().restaurant_id, fx.r1);
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn finalize_without_votes_completes_with_no_selection() {
        let fx = setup().await;

        let session = fx
            .handler
            .handle(FinalizeSessionCommand {
                session_id: fx.session_id,
            })
            .await
            .unwrap();

        assert!(session.final_selection().is_none());
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn finalize_twice_fails() {
        let fx = setup().await;
        let cmd = FinalizeSessionCommand {
            session_id: fx.session_id,
        };

        fx.handler.handle(cmd.clone()).await.unwrap();
        let result = fx.handler.handle(cmd).await;

        assert!(matches!(result, Err(SessionError::Completed)));
    }

    #[tokio::test]
    async fn finalize_unknown_session_fails() {
        let fx = setup().await;

        let result = fx
            .handler
            .handle(FinalizeSessionCommand {
                session_id: SessionId::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }
}
