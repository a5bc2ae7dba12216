//! Shared read-modify-write loop for session mutations.
//!
//! Every mutation is a conditional update on the aggregate's version token:
//! load, apply, store. A lost race reloads and reapplies, bounded by
//! [`MAX_UPDATE_ATTEMPTS`], so concurrent invites and votes on the same
//! session never lose updates.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

/// Bounded retries for version-conflict races.
pub const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Loads the session, applies `apply`, and persists with a version check.
///
/// Retries on `ConcurrentModification` up to [`MAX_UPDATE_ATTEMPTS`] times,
/// then surfaces a conflict error.
pub(crate) async fn mutate_session<F>(
    store: &Arc<dyn SessionStore>,
    session_id: &SessionId,
    mut apply: F,
) -> Result<Session, SessionError>
where
    F: FnMut(&mut Session) -> Result<(), DomainError>,
{
    for attempt in 1..=MAX_UPDATE_ATTEMPTS {
        let mut session = store
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| SessionError::not_found(*session_id))?;

        apply(&mut session)?;

        match store.update(&session).await {
            Ok(version) => {
                session.set_version(version);
                return Ok(session);
            }
            Err(e) if e.code == ErrorCode::ConcurrentModification => {
                tracing::debug!(
                    session_id = %session_id,
                    attempt,
                    "session update lost version race, retrying"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(SessionError::conflict(format!(
        "session {} update exhausted {} attempts",
        session_id, MAX_UPDATE_ATTEMPTS
    )))
}
