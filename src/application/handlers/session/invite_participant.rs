//! InviteParticipantHandler - Command handler for inviting a user.
//!
//! The invite itself must succeed or fail atomically against the session;
//! the push notification is fire-and-forget and never fails the request.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{NotificationSender, SessionStore, UserDirectory};

use super::mutate::mutate_session;

/// Command to invite a user into a session.
#[derive(Debug, Clone)]
pub struct InviteParticipantCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Handler for inviting participants.
pub struct InviteParticipantHandler {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn NotificationSender>,
}

impl InviteParticipantHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            sessions,
            users,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: InviteParticipantCommand) -> Result<Session, SessionError> {
        // The invitee must resolve to an existing user.
        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            tracing::warn!(
                operation = "invite_participant",
                session_id = %cmd.session_id,
                user_id = %cmd.user_id,
                "invitee does not exist"
            );
            return Err(SessionError::user_not_found(cmd.user_id));
        }

        let session = mutate_session(&self.sessions, &cmd.session_id, |s| {
            s.invite(cmd.user_id).map(|_| ())
        })
        .await?;

        tracing::info!(
            operation = "invite_participant",
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            participants = session.participants().len(),
            "participant invited"
        );

        self.notify_invitee(&session, &cmd.user_id).await;
        Ok(session)
    }

    /// Push the invite notification with the creator's display name.
    /// Failures are logged and swallowed; the invitation already succeeded.
    async fn notify_invitee(&self, session: &Session, invitee: &UserId) {
        let inviter_name = match self.users.find_by_id(session.creator()).await {
            Ok(Some(creator)) => creator.display_name().to_string(),
            Ok(None) => "Someone".to_string(),
            Err(e) => {
                tracing::warn!(
                    operation = "invite_participant",
                    session_id = %session.id(),
                    error = %e,
                    "could not resolve inviter, skipping notification"
                );
                return;
            }
        };

        if let Err(e) = self
            .notifier
            .send_invite(session.id(), invitee, &inviter_name)
            .await
        {
            tracing::warn!(
                operation = "invite_participant",
                session_id = %session.id(),
                user_id = %invitee,
                error = %e,
                "invite notification failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionStore, InMemoryUserDirectory};
    use crate::domain::foundation::{DomainError, ErrorCode, JoinCode, SearchArea};
    use crate::domain::user::User;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<(SessionId, UserId, String)>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<(SessionId, UserId, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingNotifier {
        async fn send_invite(
            &self,
            session_id: &SessionId,
            invited_user: &UserId,
            inviter_display_name: &str,
        ) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::new(
                    ErrorCode::DependencyError,
                    "Simulated push failure",
                ));
            }
            self.sent.lock().unwrap().push((
                *session_id,
                *invited_user,
                inviter_display_name.to_string(),
            ));
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        handler: InviteParticipantHandler,
        notifier: Arc<RecordingNotifier>,
        session_id: SessionId,
        invitee_id: UserId,
    }

    async fn setup(notifier: RecordingNotifier) -> Fixture {
        let creator = User::new(UserId::new(), "creator@example.com", "Casey").unwrap();
        let invitee = User::new(UserId::new(), "invitee@example.com", "Ira").unwrap();
        let creator_id = *creator.id();
        let invitee_id = *invitee.id();

        let store = Arc::new(InMemorySessionStore::new());
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![creator, invitee]));
        let notifier = Arc::new(notifier);

        let session = Session::new(
            SessionId::new(),
            creator_id,
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("AB12C").unwrap(),
            vec![],
        );
        let session_id = *session.id();
        store.insert(&session).await.unwrap();

        let handler =
            InviteParticipantHandler::new(store.clone(), users, notifier.clone());

        Fixture {
            store,
            handler,
            notifier,
            session_id,
            invitee_id,
        }
    }

    #[tokio::test]
    async fn invite_adds_participant_and_notifies_with_creator_name() {
        let fx = setup(RecordingNotifier::new()).await;

        let session = fx
            .handler
            .handle(InviteParticipantCommand {
                session_id: fx.session_id,
                user_id: fx.invitee_id,
            })
            .await
            .unwrap();

        assert!(session.is_participant(&fx.invitee_id));
        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, fx.session_id);
        assert_eq!(sent[0].1, fx.invitee_id);
        assert_eq!(sent[0].2, "Casey");
    }

    #[tokio::test]
    async fn double_invite_leaves_single_participant_entry() {
        let fx = setup(RecordingNotifier::new()).await;
        let cmd = InviteParticipantCommand {
            session_id: fx.session_id,
            user_id: fx.invitee_id,
        };

        fx.handler.handle(cmd.clone()).await.unwrap();
        let session = fx.handler.handle(cmd).await.unwrap();

        let entries = session
            .participants()
            .iter()
            .filter(|p| p.user_id() == &fx.invitee_id)
            .count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn invite_on_completed_session_fails_and_leaves_it_unmodified() {
        let fx = setup(RecordingNotifier::new()).await;

        // Complete the stored session out of band.
        let mut session = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();
        session.finalize().unwrap();
        fx.store.update(&session).await.unwrap();
        let before = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();

        let result = fx
            .handler
            .handle(InviteParticipantCommand {
                session_id: fx.session_id,
                user_id: fx.invitee_id,
            })
            .await;

        assert!(matches!(result, Err(SessionError::Completed)));
        let after = fx.store.find_by_id(&fx.session_id).await.unwrap().unwrap();
        assert_eq!(after, before);
        assert!(fx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn invite_unknown_user_fails() {
        let fx = setup(RecordingNotifier::new()).await;

        let result = fx
            .handler
            .handle(InviteParticipantCommand {
                session_id: fx.session_id,
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn invite_unknown_session_fails() {
        let fx = setup(RecordingNotifier::new()).await;

        let result = fx
            .handler
            .handle(InviteParticipantCommand {
                session_id: SessionId::new(),
                user_id: fx.invitee_id,
            })
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_invite() {
        let fx = setup(RecordingNotifier::failing()).await;

        let session = fx
            .handler
            .handle(InviteParticipantCommand {
                session_id: fx.session_id,
                user_id: fx.invitee_id,
            })
            .await
            .unwrap();

        assert!(session.is_participant(&fx.invitee_id));
    }
}
