//! HTTP handlers for user endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::session::dto::{ErrorResponse, SessionListResponse, SessionResponse};
use crate::application::handlers::session::{ListUserSessionsHandler, ListUserSessionsQuery};
use crate::application::handlers::user::{
    CreateUserCommand, CreateUserHandler, GetUserHandler, GetUserQuery, UpdateFcmTokenCommand,
    UpdateFcmTokenHandler,
};
use crate::domain::foundation::UserId;
use crate::domain::user::UserError;

use super::dto::{CreateUserRequest, UpdateFcmTokenRequest, UserResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    create_handler: Arc<CreateUserHandler>,
    get_handler: Arc<GetUserHandler>,
    fcm_handler: Arc<UpdateFcmTokenHandler>,
    sessions_handler: Arc<ListUserSessionsHandler>,
}

impl UserHandlers {
    pub fn new(
        create_handler: Arc<CreateUserHandler>,
        get_handler: Arc<GetUserHandler>,
        fcm_handler: Arc<UpdateFcmTokenHandler>,
        sessions_handler: Arc<ListUserSessionsHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            fcm_handler,
            sessions_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /users - Register a new user
pub async fn create_user(
    State(handlers): State<UserHandlers>,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    let cmd = CreateUserCommand {
        email: req.email,
        display_name: req.display_name,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(user) => {
            let response = UserResponse::from(&user);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_user_error("create_user", e),
    }
}

/// GET /users/:id - Get user details
pub async fn get_user(
    State(handlers): State<UserHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    match handlers.get_handler.handle(GetUserQuery { user_id }).await {
        Ok(user) => {
            let response = UserResponse::from(&user);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(UserError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("User not found")),
        )
            .into_response(),
        Err(e) => handle_user_error("get_user", e),
    }
}

/// POST /users/:id/fcm-token - Register a device token
pub async fn update_fcm_token(
    State(handlers): State<UserHandlers>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateFcmTokenRequest>,
) -> Response {
    let user_id = match user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    let cmd = UpdateFcmTokenCommand {
        user_id,
        fcm_token: req.fcm_token,
    };

    match handlers.fcm_handler.handle(cmd).await {
        Ok(user) => {
            let response = UserResponse::from(&user);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_user_error("update_fcm_token", e),
    }
}

/// GET /users/:id/sessions - List the user's active sessions
pub async fn list_user_sessions(
    State(handlers): State<UserHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    match handlers
        .sessions_handler
        .handle(ListUserSessionsQuery { user_id })
        .await
    {
        Ok(sessions) => {
            let response = SessionListResponse {
                sessions: sessions.iter().map(SessionResponse::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(operation = "list_user_sessions", error = %e, "session fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Unable to fetch sessions")),
            )
                .into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

/// Logs the full error, then answers with a generic client message.
fn handle_user_error(operation: &str, error: UserError) -> Response {
    match &error {
        UserError::NotFound(_) => {
            tracing::warn!(operation, error = %error, "user unavailable");
            bad_request("User not found")
        }
        UserError::AlreadyExists(_) => {
            tracing::warn!(operation, error = %error, "duplicate user");
            bad_request("User already exists")
        }
        UserError::ValidationFailed { .. } => {
            tracing::warn!(operation, error = %error, "validation failed");
            bad_request("Invalid request parameters")
        }
        UserError::Infrastructure(_) => {
            tracing::error!(operation, error = %error, "user operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_maps_to_400() {
        let response =
            handle_user_error("create_user", UserError::already_exists("a@example.com"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_failure_maps_to_400() {
        let response =
            handle_user_error("create_user", UserError::validation("email", "missing @"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response =
            handle_user_error("create_user", UserError::infrastructure("db down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
