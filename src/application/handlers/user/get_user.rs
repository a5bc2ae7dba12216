//! GetUserHandler - Query handler for fetching one user.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::user::{User, UserError};
use crate::ports::UserDirectory;

/// Query for a single user by id.
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub user_id: UserId,
}

/// Handler for fetching users.
pub struct GetUserHandler {
    users: Arc<dyn UserDirectory>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<User, UserError> {
        self.users
            .find_by_id(&query.user_id)
            .await?
            .ok_or_else(|| UserError::not_found(query.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserDirectory;

    #[tokio::test]
    async fn returns_stored_user() {
        let user = User::new(UserId::new(), "ada@example.com", "Ada").unwrap();
        let dir = Arc::new(InMemoryUserDirectory::with_users(vec![user.clone()]));
        let handler = GetUserHandler::new(dir);

        let found = handler
            .handle(GetUserQuery { user_id: *user.id() })
            .await
            .unwrap();

        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn missing_user_fails_with_not_found() {
        let handler = GetUserHandler::new(Arc::new(InMemoryUserDirectory::new()));

        let result = handler
            .handle(GetUserQuery {
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
