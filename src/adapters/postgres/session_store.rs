//! PostgreSQL implementation of SessionStore.
//!
//! Sessions persist as one row per aggregate: scalar columns for the indexed
//! fields, JSONB documents for the nested arrays (participants, pending
//! invitations, restaurant tallies). A partial unique index on `join_code`
//! over non-completed rows enforces code uniqueness at the store, and the
//! `version` column backs conditional updates.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, JoinCode, SearchArea, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::{FinalSelection, Participant, RestaurantTally, Session};
use crate::ports::SessionStore;

/// Name of the partial unique index guarding active join codes.
const ACTIVE_JOIN_CODE_INDEX: &str = "sessions_active_join_code_idx";

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert(&self, session: &Session) -> Result<(), DomainError> {
        let participants = to_json("participants", session.participants())?;
        let pending = to_json("pending_invitations", session.pending_invitations())?;
        let restaurants = to_json("restaurants", session.restaurants())?;
        let final_selection = session
            .final_selection()
            .map(|s| to_json("final_selection", s))
            .transpose()?;
        let area = to_json("area", session.area())?;

        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, join_code, creator, area, status, participants,
                pending_invitations, restaurants, final_selection,
                created_at, expires_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.join_code().as_str())
        .bind(session.creator().as_uuid())
        .bind(area)
        .bind(session_status_to_str(session.status()))
        .bind(participants)
        .bind(pending)
        .bind(restaurants)
        .bind(final_selection)
        .bind(session.created_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.version())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, ACTIVE_JOIN_CODE_INDEX) {
                DomainError::new(
                    ErrorCode::DuplicateJoinCode,
                    format!("Join code already in use: {}", session.join_code()),
                )
            } else {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert session: {}", e),
                )
            }
        })?;

        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<i64, DomainError> {
        let participants = to_json("participants", session.participants())?;
        let pending = to_json("pending_invitations", session.pending_invitations())?;
        let restaurants = to_json("restaurants", session.restaurants())?;
        let final_selection = session
            .final_selection()
            .map(|s| to_json("final_selection", s))
            .transpose()?;

        let row = sqlx::query(
            r#"
            UPDATE sessions SET
                status = $3,
                participants = $4,
                pending_invitations = $5,
                restaurants = $6,
                final_selection = $7,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.version())
        .bind(session_status_to_str(session.status()))
        .bind(participants)
        .bind(pending)
        .bind(restaurants)
        .bind(final_selection)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update session: {}", e),
            )
        })?;

        match row {
            Some(row) => row.try_get("version").map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to read updated version: {}", e),
                )
            }),
            // Distinguish a missing row from a lost version race.
            None => {
                let exists: (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE id = $1")
                        .bind(session.id().as_uuid())
                        .fetch_one(&self.pool)
                        .await
                        .map_err(|e| {
                            DomainError::new(
                                ErrorCode::DatabaseError,
                                format!("Failed to check session existence: {}", e),
                            )
                        })?;

                if exists.0 == 0 {
                    Err(DomainError::new(
                        ErrorCode::SessionNotFound,
                        format!("Session not found: {}", session.id()),
                    ))
                } else {
                    Err(DomainError::new(
                        ErrorCode::ConcurrentModification,
                        format!(
                            "Version mismatch for session {} at version {}",
                            session.id(),
                            session.version()
                        ),
                    ))
                }
            }
        }
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, join_code, creator, area, status, participants,
                   pending_invitations, restaurants, final_selection,
                   created_at, expires_at, version
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session: {}", e),
            )
        })?;

        row.map(row_to_session).transpose()
    }

    async fn find_active_by_join_code(
        &self,
        code: &JoinCode,
    ) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, join_code, creator, area, status, participants,
                   pending_invitations, restaurants, final_selection,
                   created_at, expires_at, version
            FROM sessions
            WHERE join_code = $1 AND status <> 'COMPLETED'
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session by join code: {}", e),
            )
        })?;

        row.map(row_to_session).transpose()
    }

    async fn find_active_by_creator(
        &self,
        creator: &UserId,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, join_code, creator, area, status, participants,
                   pending_invitations, restaurants, final_selection,
                   created_at, expires_at, version
            FROM sessions
            WHERE creator = $1 AND status <> 'COMPLETED'
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch sessions by creator: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete session: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn session_status_to_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Created => "CREATED",
        SessionStatus::Matching => "MATCHING",
        SessionStatus::Completed => "COMPLETED",
    }
}

fn str_to_session_status(s: &str) -> Result<SessionStatus, DomainError> {
    match s {
        "CREATED" => Ok(SessionStatus::Created),
        "MATCHING" => Ok(SessionStatus::Matching),
        "COMPLETED" => Ok(SessionStatus::Completed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid session status: {}", s),
        )),
    }
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err.as_database_error() {
        Some(db_err) => db_err.constraint() == Some(constraint),
        None => false,
    }
}

fn to_json<T: serde::Serialize>(
    field: &str,
    value: T,
) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to serialize {}: {}", field, e),
        )
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    field: &str,
    value: serde_json::Value,
) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to deserialize {}: {}", field, e),
        )
    })
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let get_err = |field: &str, e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", field, e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(|e| get_err("id", e))?;
    let join_code: String = row.try_get("join_code").map_err(|e| get_err("join_code", e))?;
    let creator: uuid::Uuid = row.try_get("creator").map_err(|e| get_err("creator", e))?;
    let area: serde_json::Value = row.try_get("area").map_err(|e| get_err("area", e))?;
    let status_str: String = row.try_get("status").map_err(|e| get_err("status", e))?;
    let participants: serde_json::Value = row
        .try_get("participants")
        .map_err(|e| get_err("participants", e))?;
    let pending: serde_json::Value = row
        .try_get("pending_invitations")
        .map_err(|e| get_err("pending_invitations", e))?;
    let restaurants: serde_json::Value = row
        .try_get("restaurants")
        .map_err(|e| get_err("restaurants", e))?;
    let final_selection: Option<serde_json::Value> = row
        .try_get("final_selection")
        .map_err(|e| get_err("final_selection", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| get_err("created_at", e))?;
    let expires_at: chrono::DateTime<chrono::Utc> = row
        .try_get("expires_at")
        .map_err(|e| get_err("expires_at", e))?;
    let version: i64 = row.try_get("version").map_err(|e| get_err("version", e))?;

    let join_code = JoinCode::parse(join_code).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid stored join code: {}", e),
        )
    })?;
    let area: SearchArea = from_json("area", area)?;
    let participants: Vec<Participant> = from_json("participants", participants)?;
    let pending: Vec<UserId> = from_json("pending_invitations", pending)?;
    let restaurants: Vec<RestaurantTally> = from_json("restaurants", restaurants)?;
    let final_selection: Option<FinalSelection> = final_selection
        .map(|v| from_json("final_selection", v))
        .transpose()?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        join_code,
        UserId::from_uuid(creator),
        area,
        str_to_session_status(&status_str)?,
        participants,
        pending,
        restaurants,
        final_selection,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(expires_at),
        version,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_conversion_roundtrips() {
        for status in [
            SessionStatus::Created,
            SessionStatus::Matching,
            SessionStatus::Completed,
        ] {
            assert_eq!(
                str_to_session_status(session_status_to_str(status)).unwrap(),
                status
            );
        }
    }

    #[test]
    fn str_to_session_status_rejects_invalid() {
        assert!(str_to_session_status("ACTIVE").is_err());
        assert!(str_to_session_status("").is_err());
    }

    #[test]
    fn status_strings_match_wire_format() {
        // The partial unique index predicate compares against this literal.
        assert_eq!(session_status_to_str(SessionStatus::Completed), "COMPLETED");
    }
}
