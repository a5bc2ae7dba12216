//! UpdateFcmTokenHandler - Command handler for registering a device token.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::user::{User, UserError};
use crate::ports::UserDirectory;

/// Command registering a push-notification device token.
#[derive(Debug, Clone)]
pub struct UpdateFcmTokenCommand {
    pub user_id: UserId,
    pub fcm_token: String,
}

/// Handler for device token registration.
pub struct UpdateFcmTokenHandler {
    users: Arc<dyn UserDirectory>,
}

impl UpdateFcmTokenHandler {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateFcmTokenCommand) -> Result<User, UserError> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| UserError::not_found(cmd.user_id))?;

        user.add_fcm_token(cmd.fcm_token)?;
        self.users.update(&user).await?;

        tracing::info!(
            operation = "update_fcm_token",
            user_id = %cmd.user_id,
            tokens = user.fcm_tokens().len(),
            "device token registered"
        );
        Ok(user)
    }
}
