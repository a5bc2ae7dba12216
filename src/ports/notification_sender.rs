//! Notification sender port.
//!
//! Push delivery is fire-and-forget from the session manager's perspective:
//! callers log failures and never propagate them.

use crate::domain::foundation::{DomainError, SessionId, UserId};
use async_trait::async_trait;

/// Port for the push-notification collaborator.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Notify a user they were invited to a session.
    ///
    /// `inviter_display_name` identifies who sent the invite in the
    /// notification body.
    async fn send_invite(
        &self,
        session_id: &SessionId,
        invited_user: &UserId,
        inviter_display_name: &str,
    ) -> Result<(), DomainError>;
}
