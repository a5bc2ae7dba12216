//! CreateUserHandler - Command handler for registering a user.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::user::{User, UserError};
use crate::ports::UserDirectory;

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: String,
    pub display_name: String,
}

/// Handler for registering users.
pub struct CreateUserHandler {
    users: Arc<dyn UserDirectory>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: CreateUserCommand) -> Result<User, UserError> {
        let user = User::new(UserId::new(), cmd.email.clone(), cmd.display_name)?;

        if self.users.find_by_email(user.email()).await?.is_some() {
            return Err(UserError::already_exists(cmd.email));
        }

        self.users.insert(&user).await?;
        tracing::info!(
            operation = "create_user",
            user_id = %user.id(),
            "user created"
        );
        Ok(user)
    }
}
