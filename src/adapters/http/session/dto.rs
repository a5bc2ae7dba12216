//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types. Field names follow
//! the mobile client's camelCase wire format.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionStatus;
use crate::domain::session::{
    FinalSelection, Participant, RestaurantTally, Session, Swipe,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

/// Request to invite a user into a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteParticipantRequest {
    pub user_id: String,
}

/// Request to join a session by code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    pub join_code: String,
    pub user_id: String,
}

/// Request recording one swipe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSwipeRequest {
    pub user_id: String,
    pub restaurant_id: String,
    pub liked: bool,
}

/// Request flagging a participant as done swiping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDoneRequest {
    pub user_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for session creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: String,
    pub join_code: String,
}

/// Response for session command operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCommandResponse {
    pub session_id: String,
    pub message: String,
}

/// One swipe in a participant's history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub restaurant_id: String,
    pub liked: bool,
    pub swiped_at: String,
}

impl From<&Swipe> for SwipeResponse {
    fn from(swipe: &Swipe) -> Self {
        Self {
            restaurant_id: swipe.restaurant_id.to_string(),
            liked: swipe.liked,
            swiped_at: swipe.swiped_at.as_datetime().to_rfc3339(),
        }
    }
}

/// One participant entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub user_id: String,
    pub preferences: Vec<SwipeResponse>,
    pub done_swiping: bool,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.user_id().to_string(),
            preferences: participant.preferences().iter().map(Into::into).collect(),
            done_swiping: participant.is_done_swiping(),
        }
    }
}

/// One candidate restaurant tally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantTallyResponse {
    pub restaurant_id: String,
    pub score: f64,
    pub total_votes: u32,
    pub positive_votes: u32,
}

impl From<&RestaurantTally> for RestaurantTallyResponse {
    fn from(tally: &RestaurantTally) -> Self {
        Self {
            restaurant_id: tally.restaurant_id().to_string(),
            score: tally.score(),
            total_votes: tally.total_votes(),
            positive_votes: tally.positive_votes(),
        }
    }
}

/// The committed outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSelectionResponse {
    pub restaurant_id: String,
    pub selected_at: String,
}

impl From<&FinalSelection> for FinalSelectionResponse {
    fn from(selection: &FinalSelection) -> Self {
        Self {
            restaurant_id: selection.restaurant_id.to_string(),
            selected_at: selection.selected_at.as_datetime().to_rfc3339(),
        }
    }
}

/// The session's search area.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAreaResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// Detailed session view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub join_code: String,
    pub creator: String,
    pub status: SessionStatus,
    pub area: SearchAreaResponse,
    pub participants: Vec<ParticipantResponse>,
    pub pending_invitations: Vec<String>,
    pub restaurants: Vec<RestaurantTallyResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_selection: Option<FinalSelectionResponse>,
    pub created_at: String,
    pub expires_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            join_code: session.join_code().to_string(),
            creator: session.creator().to_string(),
            status: session.status(),
            area: SearchAreaResponse {
                latitude: session.area().latitude(),
                longitude: session.area().longitude(),
                radius_meters: session.area().radius_meters(),
            },
            participants: session.participants().iter().map(Into::into).collect(),
            pending_invitations: session
                .pending_invitations()
                .iter()
                .map(|u| u.to_string())
                .collect(),
            restaurants: session.restaurants().iter().map(Into::into).collect(),
            final_selection: session.final_selection().map(Into::into),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            expires_at: session.expires_at().as_datetime().to_rfc3339(),
        }
    }
}

/// List of session views.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionResponse>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{JoinCode, RestaurantId, SearchArea, SessionId, UserId};

    #[test]
    fn create_session_request_deserializes() {
        let json = r#"{
            "userId": "550e8400-e29b-41d4-a716-446655440000",
            "latitude": 49.28,
            "longitude": -123.12,
            "radius": 1000
        }"#;
        let req: CreateSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(req.latitude, 49.28);
        assert_eq!(req.radius, 1000.0);
    }

    #[test]
    fn join_session_request_deserializes() {
        let json = r#"{"joinCode": "AB12C", "userId": "550e8400-e29b-41d4-a716-446655440000"}"#;
        let req: JoinSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.join_code, "AB12C");
    }

    #[test]
    fn session_response_conversion_includes_all_sections() {
        let creator = UserId::new();
        let restaurant = RestaurantId::new();
        let mut session = Session::new(
            SessionId::new(),
            creator,
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("AB12C").unwrap(),
            vec![restaurant],
        );
        session.record_swipe(&creator, &restaurant, true).unwrap();

        let response = SessionResponse::from(&session);

        assert_eq!(response.join_code, "AB12C");
        assert_eq!(response.participants.len(), 1);
        assert_eq!(response.participants[0].preferences.len(), 1);
        assert_eq!(response.restaurants.len(), 1);
        assert_eq!(response.restaurants[0].total_votes, 1);
        assert!(response.final_selection.is_none());
    }

    #[test]
    fn session_response_serializes_camel_case() {
        let session = Session::new(
            SessionId::new(),
            UserId::new(),
            SearchArea::new(49.28, -123.12, 1000.0).unwrap(),
            JoinCode::parse("AB12C").unwrap(),
            vec![],
        );

        let json = serde_json::to_value(SessionResponse::from(&session)).unwrap();

        assert!(json.get("joinCode").is_some());
        assert!(json.get("pendingInvitations").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "CREATED");
        // No selection yet, so the field is omitted entirely.
        assert!(json.get("finalSelection").is_none());
    }

    #[test]
    fn error_response_bad_request_creates_correctly() {
        let error = ErrorResponse::bad_request("Unable to create session");
        assert_eq!(error.code, "BAD_REQUEST");
        assert_eq!(error.message, "Unable to create session");
    }
}
