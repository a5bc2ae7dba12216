//! Logging no-op implementation of NotificationSender.
//!
//! Stands in for FCM in tests and local development.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::ports::NotificationSender;

/// Sender that logs invites instead of delivering them.
#[derive(Default)]
pub struct LogOnlyNotificationSender;

impl LogOnlyNotificationSender {
    /// Creates a new log-only sender.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LogOnlyNotificationSender {
    async fn send_invite(
        &self,
        session_id: &SessionId,
        invited_user: &UserId,
        inviter_display_name: &str,
    ) -> Result<(), DomainError> {
        tracing::info!(
            operation = "send_invite",
            session_id = %session_id,
            user_id = %invited_user,
            inviter = inviter_display_name,
            "invite notification (log only)"
        );
        Ok(())
    }
}
