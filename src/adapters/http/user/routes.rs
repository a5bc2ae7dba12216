//! HTTP routes for user endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_user, get_user, list_user_sessions, update_fcm_token, UserHandlers,
};

/// Creates the user router with all endpoints.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user))
        .route("/:id/fcm-token", post(update_fcm_token))
        .route("/:id/sessions", get(list_user_sessions))
        .with_state(handlers)
}
