//! User account entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

/// A registered user: the directory entry sessions reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    id: UserId,

    /// Email address, unique across users.
    email: String,

    /// Name shown to other participants (e.g. in invite notifications).
    display_name: String,

    /// Registered push-notification device tokens.
    fcm_tokens: Vec<String>,

    /// When the account was created.
    created_at: Timestamp,
}

impl User {
    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if email or display name is empty
    /// - `InvalidFormat` if the email has no '@'
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        let display_name = display_name.into();

        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        if display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }

        Ok(Self {
            id,
            email,
            display_name,
            fcm_tokens: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitutes a user from persistence (no validation).
    pub fn reconstitute(
        id: UserId,
        email: String,
        display_name: String,
        fcm_tokens: Vec<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            fcm_tokens,
            created_at,
        }
    }

    /// Returns the user ID.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the registered device tokens.
    pub fn fcm_tokens(&self) -> &[String] {
        &self.fcm_tokens
    }

    /// Returns when the account was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Registers a device token. Duplicate registrations are dropped.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the token is empty
    pub fn add_fcm_token(&mut self, token: impl Into<String>) -> Result<(), ValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ValidationError::empty_field("fcm_token"));
        }
        if !self.fcm_tokens.contains(&token) {
            self.fcm_tokens.push(token);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(UserId::new(), "ada@example.com", "Ada").unwrap()
    }

    #[test]
    fn new_user_has_no_tokens() {
        let user = test_user();
        assert!(user.fcm_tokens().is_empty());
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn new_user_rejects_empty_email() {
        assert!(User::new(UserId::new(), "", "Ada").is_err());
        assert!(User::new(UserId::new(), "   ", "Ada").is_err());
    }

    #[test]
    fn new_user_rejects_email_without_at() {
        assert!(User::new(UserId::new(), "not-an-email", "Ada").is_err());
    }

    #[test]
    fn new_user_rejects_empty_display_name() {
        assert!(User::new(UserId::new(), "ada@example.com", "").is_err());
    }

    #[test]
    fn add_fcm_token_deduplicates() {
        let mut user = test_user();
        user.add_fcm_token("token-1").unwrap();
        user.add_fcm_token("token-1").unwrap();
        user.add_fcm_token("token-2").unwrap();
        assert_eq!(user.fcm_tokens(), &["token-1", "token-2"]);
    }

    #[test]
    fn add_fcm_token_rejects_empty() {
        let mut user = test_user();
        assert!(user.add_fcm_token("").is_err());
    }
}
