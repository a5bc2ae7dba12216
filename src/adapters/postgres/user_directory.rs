//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::UserDirectory;

/// Name of the unique constraint on user emails.
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of UserDirectory.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a new PostgresUserDirectory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let tokens = serde_json::to_value(user.fcm_tokens()).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to serialize fcm_tokens: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, fcm_tokens, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.display_name())
        .bind(tokens)
        .bind(user.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let is_dup = e
                .as_database_error()
                .map(|d| d.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT))
                .unwrap_or(false);
            if is_dup {
                DomainError::new(
                    ErrorCode::AlreadyExists,
                    format!("User already exists: {}", user.email()),
                )
            } else {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert user: {}", e),
                )
            }
        })?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let tokens = serde_json::to_value(user.fcm_tokens()).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to serialize fcm_tokens: {}", e),
            )
        })?;

        let result = sqlx::query(
            r#"
            UPDATE users SET display_name = $2, fcm_tokens = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.display_name())
        .bind(tokens)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update user: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, display_name, fcm_tokens, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user: {}", e),
            )
        })?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, display_name, fcm_tokens, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user by email: {}", e),
            )
        })?;

        row.map(row_to_user).transpose()
    }
}

fn row_to_user(row: sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let get_err = |field: &str, e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", field, e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(|e| get_err("id", e))?;
    let email: String = row.try_get("email").map_err(|e| get_err("email", e))?;
    let display_name: String = row
        .try_get("display_name")
        .map_err(|e| get_err("display_name", e))?;
    let tokens: serde_json::Value = row
        .try_get("fcm_tokens")
        .map_err(|e| get_err("fcm_tokens", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| get_err("created_at", e))?;

    let fcm_tokens: Vec<String> = serde_json::from_value(tokens).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to deserialize fcm_tokens: {}", e),
        )
    })?;

    Ok(User::reconstitute(
        UserId::from_uuid(id),
        email,
        display_name,
        fcm_tokens,
        Timestamp::from_datetime(created_at),
    ))
}
