//! Session-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, JoinCode, SessionId, UserId, ValidationError};

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found.
    NotFound(SessionId),
    /// No non-completed session holds this join code.
    UnknownJoinCode(JoinCode),
    /// Session is completed and read-only.
    Completed,
    /// The referenced user does not exist.
    UserNotFound(UserId),
    /// The acting user has not joined the session.
    ParticipantNotFound,
    /// The restaurant is not a candidate in this session.
    RestaurantNotInSession,
    /// No unused join code found within the retry budget.
    JoinCodeExhausted,
    /// Concurrent update lost the race after bounded retries.
    Conflict(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// An external collaborator failed (restaurant lookup).
    Dependency(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }

    pub fn user_not_found(id: UserId) -> Self {
        SessionError::UserNotFound(id)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        SessionError::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        SessionError::Dependency(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::UnknownJoinCode(_) => ErrorCode::SessionNotFound,
            SessionError::Completed => ErrorCode::SessionCompleted,
            SessionError::UserNotFound(_) => ErrorCode::UserNotFound,
            SessionError::ParticipantNotFound => ErrorCode::ParticipantNotFound,
            SessionError::RestaurantNotInSession => ErrorCode::RestaurantNotInSession,
            SessionError::JoinCodeExhausted => ErrorCode::JoinCodeExhausted,
            SessionError::Conflict(_) => ErrorCode::ConcurrentModification,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Dependency(_) => ErrorCode::DependencyError,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(id) => format!("Session not found: {}", id),
            SessionError::UnknownJoinCode(code) => {
                format!("No active session with join code {}", code)
            }
            SessionError::Completed => "Session is already completed".to_string(),
            SessionError::UserNotFound(id) => format!("User not found: {}", id),
            SessionError::ParticipantNotFound => {
                "User is not a participant of this session".to_string()
            }
            SessionError::RestaurantNotInSession => {
                "Restaurant is not a candidate in this session".to_string()
            }
            SessionError::JoinCodeExhausted => {
                "Could not generate an unused join code".to_string()
            }
            SessionError::Conflict(msg) => format!("Concurrent update conflict: {}", msg),
            SessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SessionError::Dependency(msg) => format!("Dependency failure: {}", msg),
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::from(DomainError::from(err))
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionCompleted => SessionError::Completed,
            ErrorCode::ParticipantNotFound => SessionError::ParticipantNotFound,
            ErrorCode::RestaurantNotInSession => SessionError::RestaurantNotInSession,
            ErrorCode::InvalidStateTransition => SessionError::Completed,
            ErrorCode::ConcurrentModification => SessionError::Conflict(err.to_string()),
            ErrorCode::DuplicateJoinCode => SessionError::Conflict(err.to_string()),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => SessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::DependencyError => SessionError::Dependency(err.message),
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_domain_error_maps_to_completed() {
        let err: SessionError =
            DomainError::new(ErrorCode::SessionCompleted, "read-only").into();
        assert_eq!(err, SessionError::Completed);
    }

    #[test]
    fn conflict_carries_concurrent_modification_code() {
        let err = SessionError::conflict("version mismatch");
        assert_eq!(err.code(), ErrorCode::ConcurrentModification);
    }

    #[test]
    fn validation_error_preserves_field_detail() {
        let err: SessionError = DomainError::validation("radius", "must be positive").into();
        match err {
            SessionError::ValidationFailed { field, .. } => assert_eq!(field, "radius"),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn display_includes_identifiers() {
        let id = SessionId::new();
        let err = SessionError::not_found(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
