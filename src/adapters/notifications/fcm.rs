//! Firebase Cloud Messaging implementation of NotificationSender.
//!
//! Resolves the invitee's registered device tokens through the user
//! directory and fans one push out per token. A user with no tokens is a
//! logged no-op, matching the fire-and-forget contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};
use crate::ports::{NotificationSender, UserDirectory};

/// Configuration for the FCM sender.
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Server key for authentication.
    server_key: Secret<String>,
    /// Base URL for the API (default: https://fcm.googleapis.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl FcmConfig {
    /// Creates a new configuration with the given server key.
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: Secret::new(server_key.into()),
            base_url: "https://fcm.googleapis.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn server_key(&self) -> &str {
        self.server_key.expose_secret()
    }
}

/// FCM implementation of the push-notification collaborator.
pub struct FcmNotificationSender {
    config: FcmConfig,
    client: Client,
    users: Arc<dyn UserDirectory>,
}

impl FcmNotificationSender {
    /// Creates a new sender with the given configuration.
    pub fn new(config: FcmConfig, users: Arc<dyn UserDirectory>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DependencyError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            config,
            client,
            users,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/fcm/send", self.config.base_url)
    }

    async fn push_to_token(&self, token: &str, message: &FcmMessage<'_>) -> Result<(), String> {
        let response = self
            .client
            .post(self.send_url())
            .header(
                "Authorization",
                format!("key={}", self.config.server_key()),
            )
            .json(&FcmRequest {
                to: token,
                notification: &message.notification,
                data: &message.data,
            })
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("HTTP {}", response.status()))
        }
    }
}

#[async_trait]
impl NotificationSender for FcmNotificationSender {
    async fn send_invite(
        &self,
        session_id: &SessionId,
        invited_user: &UserId,
        inviter_display_name: &str,
    ) -> Result<(), DomainError> {
        let user = match self.users.find_by_id(invited_user).await? {
            Some(user) => user,
            None => {
                tracing::warn!(
                    operation = "send_invite",
                    user_id = %invited_user,
                    "invited user not found, skipping push"
                );
                return Ok(());
            }
        };

        if user.fcm_tokens().is_empty() {
            tracing::debug!(
                operation = "send_invite",
                user_id = %invited_user,
                "no device tokens registered, skipping push"
            );
            return Ok(());
        }

        let session_id_str = session_id.to_string();
        let message = FcmMessage {
            notification: FcmNotification {
                title: "New BiteSwipe Session Invite!",
                body: format!(
                    "{} has invited you to join their food session",
                    inviter_display_name
                ),
            },
            data: FcmData {
                session_id: &session_id_str,
                kind: "SESSION_INVITE",
            },
        };

        let sends = user
            .fcm_tokens()
            .iter()
            .map(|token| self.push_to_token(token, &message));
        let results = join_all(sends).await;

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            tracing::warn!(
                operation = "send_invite",
                session_id = %session_id,
                user_id = %invited_user,
                failures,
                total = results.len(),
                "some invite pushes failed"
            );
        }

        // Only total failure surfaces; partial delivery counts as sent.
        if failures == results.len() {
            return Err(DomainError::new(
                ErrorCode::DependencyError,
                format!("All {} invite pushes failed", failures),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

struct FcmMessage<'a> {
    notification: FcmNotification<'a>,
    data: FcmData<'a>,
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    to: &'a str,
    notification: &'a FcmNotification<'a>,
    data: &'a FcmData<'a>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: String,
}

#[derive(Serialize)]
struct FcmData<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserDirectory;
    use crate::domain::user::User;

    #[test]
    fn fcm_request_serializes_expected_shape() {
        let data = FcmData {
            session_id: "abc",
            kind: "SESSION_INVITE",
        };
        let notification = FcmNotification {
            title: "New BiteSwipe Session Invite!",
            body: "Casey has invited you to join their food session".to_string(),
        };
        let request = FcmRequest {
            to: "token-1",
            notification: &notification,
            data: &data,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["to"], "token-1");
        assert_eq!(json["data"]["sessionId"], "abc");
        assert_eq!(json["data"]["type"], "SESSION_INVITE");
        assert!(json["notification"]["body"]
            .as_str()
            .unwrap()
            .contains("Casey"));
    }

    #[tokio::test]
    async fn missing_user_is_a_silent_noop() {
        let users = Arc::new(InMemoryUserDirectory::new());
        let sender = FcmNotificationSender::new(FcmConfig::new("test-key"), users).unwrap();

        let result = sender
            .send_invite(&SessionId::new(), &UserId::new(), "Casey")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn user_without_tokens_is_a_silent_noop() {
        let user = User::new(UserId::new(), "ira@example.com", "Ira").unwrap();
        let user_id = *user.id();
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![user]));
        let sender = FcmNotificationSender::new(FcmConfig::new("test-key"), users).unwrap();

        let result = sender
            .send_invite(&SessionId::new(), &user_id, "Casey")
            .await;

        assert!(result.is_ok());
    }
}
