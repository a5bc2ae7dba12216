//! JoinSessionHandler - Command handler for joining via join code.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, JoinCode, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{SessionStore, UserDirectory};

use super::mutate::MAX_UPDATE_ATTEMPTS;

/// Command to join a session by its shareable code.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub join_code: JoinCode,
    pub user_id: UserId,
}

/// Handler for joining sessions by code.
pub struct JoinSessionHandler {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
}

impl JoinSessionHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { sessions, users }
    }

    pub async fn handle(&self, cmd: JoinSessionCommand) -> Result<Session, SessionError> {
        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            tracing::warn!(
                operation = "join_session",
                user_id = %cmd.user_id,
                "joining user does not exist"
            );
            return Err(SessionError::user_not_found(cmd.user_id));
        }

        // The session is resolved by code, so the conditional-update loop
        // reloads by code as well.
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut session = self
                .sessions
                .find_active_by_join_code(&cmd.join_code)
                .await?
                .ok_or_else(|| SessionError::UnknownJoinCode(cmd.join_code.clone()))?;

            session.join(cmd.user_id)?;

            match self.sessions.update(&session).await {
                Ok(version) => {
                    session.set_version(version);
                    tracing::info!(
                        operation = "join_session",
                        session_id = %session.id(),
                        user_id = %cmd.user_id,
                        "participant joined by code"
                    );
                    return Ok(session);
                }
                Err(e) if e.code == ErrorCode::ConcurrentModification => {
                    tracing::debug!(
                        operation = "join_session",
                        join_code = %cmd.join_code,
                        attempt,
                        "join lost version race, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SessionError::conflict(format!(
            "join by code {} exhausted {} attempts",
            cmd.join_code, MAX_UPDATE_ATTEMPTS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionStore, InMemoryUserDirectory};
    use crate::domain::foundation::{SearchArea, SessionId};
    use crate::domain::user::User;

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        handler: JoinSessionHandler,
        join_code: JoinCode,
        joiner_id: UserId,
        session_id: SessionId,
    }

    async fn setup() -> Fixture {
        let creator = User::new(UserId::new(), "creator@example.com", "Casey").unwrap();
        let joiner = User::new(UserId::new(), "joiner@example.com", "Jo").unwrap();
        let creator_id = *creator.id();
        let joiner_id = *joiner.id();

        let store = Arc::new(InMemorySessionStore::new());
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![creator, joiner]));

        let join_code = JoinCode::parse("JN42X").unwrap();
        let session = Session::new(
            SessionId::new(),
            creator_id,
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            join_code.clone(),
            vec![],
        );
        let session_id = *session.id();
        store.insert(&session).await.unwrap();

        let handler = JoinSessionHandler::new(store.clone(), users);

        Fixture {
            store,
            handler,
            join_code,
            joiner_id,
            session_id,
        }
    }

    #[tokio::test]
    async fn join_by_code_adds_participant() {
        let fx = setup().await;

        let session = fx
            .handler
            .handle(JoinSessionCommand {
                join_code: fx.join_code.clone(),
                user_id: fx.joiner_id,
            })
            .await
            .unwrap();

        assert_eq!(session.id(), &fx.session_id);
        assert!(session.is_participant(&fx.joiner_id));
    }

    #[tokio::test]
    async fn join_clears_pending_invitation() {
        let fx = setup().await;

        // Invite first so a pending entry exists.
        let mut session = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();
        session.invite(fx.joiner_id).unwrap();
        let v = fx.store.update(&session).await.unwrap();
        session.set_version(v);
        assert_eq!(session.pending_invitations().len(), 1);

        let session = fx
            .handler
            .handle(JoinSessionCommand {
                join_code: fx.join_code.clone(),
                user_id: fx.joiner_id,
            })
            .await
            .unwrap();

        assert!(session.pending_invitations().is_empty());
        assert!(session.is_participant(&fx.joiner_id));
    }

    #[tokio::test]
    async fn join_twice_keeps_single_entry() {
        let fx = setup().await;
        let cmd = JoinSessionCommand {
            join_code: fx.join_code.clone(),
            user_id: fx.joiner_id,
        };

        fx.handler.handle(cmd.clone()).await.unwrap();
        let session = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(
            session
                .participants()
                .iter()
                .filter(|p| p.user_id() == &fx.joiner_id)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn unknown_code_fails() {
        let fx = setup().await;

        let result = fx
            .handler
            .handle(JoinSessionCommand {
                join_code: JoinCode::parse("ZZZ99").unwrap(),
                user_id: fx.joiner_id,
            })
            .await;

        assert!(matches!(result, Err(SessionError::UnknownJoinCode(_))));
    }

    #[tokio::test]
    async fn completed_session_is_not_joinable_by_code() {
        let fx = setup().await;

        let mut session = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();
        session.finalize().unwrap();
        fx.store.update(&session).await.unwrap();

        let result = fx
            .handler
            .handle(JoinSessionCommand {
                join_code: fx.join_code.clone(),
                user_id: fx.joiner_id,
            })
            .await;

        // Completed sessions release their codes, so the lookup misses.
        assert!(matches!(result, Err(SessionError::UnknownJoinCode(_))));
    }

    #[tokio::test]
    async fn unknown_user_fails() {
        let fx = setup().await;

        let result = fx
            .handler
            .handle(JoinSessionCommand {
                join_code: fx.join_code.clone(),
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::UserNotFound(_))));
    }
}
