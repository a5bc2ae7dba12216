//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_session, finalize_session, get_session, invite_participant, join_session,
    mark_done_swiping, record_swipe, SessionHandlers,
};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/join", post(join_session))
        .route("/:id", get(get_session))
        .route("/:id/participants", post(invite_participant))
        .route("/:id/votes", post(record_swipe))
        .route("/:id/done", post(mark_done_swiping))
        .route("/:id/result", post(finalize_session))
        .with_state(handlers)
}
