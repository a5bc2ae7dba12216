//! HTTP handlers for session endpoints.
//!
//! Error detail is logged here with operation context; clients only ever see
//! the generic messages in [`super::dto::ErrorResponse`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, FinalizeSessionCommand, FinalizeSessionHandler,
    GetSessionHandler, GetSessionQuery, InviteParticipantCommand, InviteParticipantHandler,
    JoinSessionCommand, JoinSessionHandler, MarkDoneSwipingCommand, MarkDoneSwipingHandler,
    RecordSwipeCommand, RecordSwipeHandler,
};
use crate::domain::foundation::{JoinCode, RestaurantId, SessionId, UserId};
use crate::domain::session::SessionError;

use super::dto::{
    CreateSessionRequest, ErrorResponse, InviteParticipantRequest, JoinSessionRequest,
    MarkDoneRequest, RecordSwipeRequest, SessionCommandResponse, SessionCreatedResponse,
    SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    invite_handler: Arc<InviteParticipantHandler>,
    join_handler: Arc<JoinSessionHandler>,
    swipe_handler: Arc<RecordSwipeHandler>,
    done_handler: Arc<MarkDoneSwipingHandler>,
    finalize_handler: Arc<FinalizeSessionHandler>,
}

impl SessionHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        get_handler: Arc<GetSessionHandler>,
        invite_handler: Arc<InviteParticipantHandler>,
        join_handler: Arc<JoinSessionHandler>,
        swipe_handler: Arc<RecordSwipeHandler>,
        done_handler: Arc<MarkDoneSwipingHandler>,
        finalize_handler: Arc<FinalizeSessionHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            invite_handler,
            join_handler,
            swipe_handler,
            done_handler,
            finalize_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /sessions - Create a new session
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let creator_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    let cmd = CreateSessionCommand {
        creator_id,
        latitude: req.latitude,
        longitude: req.longitude,
        radius_meters: req.radius,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(session) => {
            let response = SessionCreatedResponse {
                session_id: session.id().to_string(),
                join_code: session.join_code().to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_session_error("create_session", e),
    }
}

/// GET /sessions/:id - Get session details
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(session) => {
            let response = SessionResponse::from(&session);
            (StatusCode::OK, Json(response)).into_response()
        }
        // Pure read: an absent session is a 404, not a 400.
        Err(SessionError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session not found")),
        )
            .into_response(),
        Err(e) => handle_session_error("get_session", e),
    }
}

/// POST /sessions/:id/participants - Invite a user
pub async fn invite_participant(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<InviteParticipantRequest>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };
    let user_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    let cmd = InviteParticipantCommand {
        session_id,
        user_id,
    };

    match handlers.invite_handler.handle(cmd).await {
        Ok(session) => command_ok(&session.id().to_string(), "Participant invited"),
        Err(e) => handle_session_error("invite_participant", e),
    }
}

/// POST /sessions/join - Join a session by code
pub async fn join_session(
    State(handlers): State<SessionHandlers>,
    Json(req): Json<JoinSessionRequest>,
) -> Response {
    let join_code = match JoinCode::parse(req.join_code) {
        Ok(code) => code,
        Err(_) => return bad_request("Invalid join code"),
    };
    let user_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    match handlers
        .join_handler
        .handle(JoinSessionCommand { join_code, user_id })
        .await
    {
        Ok(session) => {
            let response = SessionResponse::from(&session);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error("join_session", e),
    }
}

/// POST /sessions/:id/votes - Record one swipe
pub async fn record_swipe(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<RecordSwipeRequest>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };
    let user_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };
    let restaurant_id = match req.restaurant_id.parse::<RestaurantId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid restaurant ID"),
    };

    let cmd = RecordSwipeCommand {
        session_id,
        user_id,
        restaurant_id,
        liked: req.liked,
    };

    match handlers.swipe_handler.handle(cmd).await {
        Ok(session) => command_ok(&session.id().to_string(), "Swipe recorded"),
        Err(e) => handle_session_error("record_swipe", e),
    }
}

/// POST /sessions/:id/done - Mark a participant done swiping
pub async fn mark_done_swiping(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<MarkDoneRequest>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };
    let user_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid user ID"),
    };

    let cmd = MarkDoneSwipingCommand {
        session_id,
        user_id,
    };

    match handlers.done_handler.handle(cmd).await {
        Ok(session) => command_ok(&session.id().to_string(), "Participant done swiping"),
        Err(e) => handle_session_error("mark_done_swiping", e),
    }
}

/// POST /sessions/:id/result - Finalize the session
pub async fn finalize_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };

    match handlers
        .finalize_handler
        .handle(FinalizeSessionCommand { session_id })
        .await
    {
        Ok(session) => {
            let response = SessionResponse::from(&session);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error("finalize_session", e),
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

fn command_ok(session_id: &str, message: &str) -> Response {
    (
        StatusCode::OK,
        Json(SessionCommandResponse {
            session_id: session_id.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Logs the full error, then answers with a generic client message.
///
/// Mutation endpoints answer 400 for absent-or-completed sessions, matching
/// the mobile client's expectations.
fn handle_session_error(operation: &str, error: SessionError) -> Response {
    match &error {
        SessionError::NotFound(_)
        | SessionError::UnknownJoinCode(_)
        | SessionError::Completed => {
            tracing::warn!(operation, error = %error, "session unavailable");
            bad_request("Session not found or already completed")
        }
        SessionError::UserNotFound(_) => {
            tracing::warn!(operation, error = %error, "user unavailable");
            bad_request("User not found")
        }
        SessionError::ParticipantNotFound => {
            tracing::warn!(operation, error = %error, "not a participant");
            bad_request("User is not a participant of this session")
        }
        SessionError::RestaurantNotInSession => {
            tracing::warn!(operation, error = %error, "unknown restaurant");
            bad_request("Restaurant is not part of this session")
        }
        SessionError::ValidationFailed { .. } => {
            tracing::warn!(operation, error = %error, "validation failed");
            bad_request("Invalid request parameters")
        }
        SessionError::JoinCodeExhausted
        | SessionError::Conflict(_)
        | SessionError::Dependency(_)
        | SessionError::Infrastructure(_) => {
            tracing::error!(operation, error = %error, "session operation failed");
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
    use crate::domain::foundation::SessionId;

    #[test]
    fn not_found_maps_to_400_on_mutations() {
        let response =
            handle_session_error("invite_participant", SessionError::not_found(SessionId::new()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn completed_maps_to_400() {
        let response = handle_session_error("record_swipe", SessionError::Completed);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_failure_maps_to_400() {
        let response = handle_session_error(
            "create_session",
            SessionError::validation("latitude", "out of range"),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_500() {
        let response =
            handle_session_error("record_swipe", SessionError::conflict("version race"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn dependency_failure_maps_to_500() {
        let response =
            handle_session_error("create_session", SessionError::dependency("places down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
