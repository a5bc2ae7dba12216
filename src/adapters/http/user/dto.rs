//! HTTP DTOs for user endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Request to register a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
}

/// Request registering a push-notification device token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFcmTokenRequest {
    pub fcm_token: String,
}

/// User view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            display_name: user.display_name().to_string(),
            created_at: user.created_at().as_datetime().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn create_user_request_deserializes() {
        let json = r#"{"email": "ada@example.com", "displayName": "Ada"}"#;
        let req: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.display_name, "Ada");
    }

    #[test]
    fn user_response_conversion() {
        let user = User::new(UserId::new(), "ada@example.com", "Ada").unwrap();
        let response = UserResponse::from(&user);
        assert_eq!(response.email, "ada@example.com");
        assert_eq!(response.display_name, "Ada");
    }

    #[test]
    fn user_response_serializes_camel_case() {
        let user = User::new(UserId::new(), "ada@example.com", "Ada").unwrap();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("displayName").is_some());
        // Device tokens never leave the backend.
        assert!(json.get("fcmTokens").is_none());
    }
}
