//! CreateSessionHandler - Command handler for starting a matching session.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, JoinCode, SearchArea, SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{RestaurantLookup, SessionStore, UserDirectory};

/// Attempts at drawing an unused join code before giving up.
///
/// 36^5 combinations make collisions astronomically unlikely; the bound only
/// guards against an unbounded loop if the store misbehaves.
pub const MAX_JOIN_CODE_ATTEMPTS: u32 = 10;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub creator_id: UserId,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
    restaurants: Arc<dyn RestaurantLookup>,
}

impl CreateSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        restaurants: Arc<dyn RestaurantLookup>,
    ) -> Self {
        Self {
            sessions,
            users,
            restaurants,
        }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<Session, SessionError> {
        let area = SearchArea::new(cmd.latitude, cmd.longitude, cmd.radius_meters)?;

        // 1. The creator must resolve to an existing user.
        if self.users.find_by_id(&cmd.creator_id).await?.is_none() {
            tracing::warn!(
                operation = "create_session",
                creator_id = %cmd.creator_id,
                "creator does not exist"
            );
            return Err(SessionError::user_not_found(cmd.creator_id));
        }

        // 2. Collect the restaurant candidates for the area. Lookup failure
        //    aborts creation.
        let candidates = self
            .restaurants
            .find_or_create_nearby(&area)
            .await
            .map_err(|e| {
                tracing::error!(
                    operation = "create_session",
                    creator_id = %cmd.creator_id,
                    error = %e,
                    "restaurant lookup failed"
                );
                SessionError::dependency(e.to_string())
            })?;
        let candidate_ids = candidates.into_iter().map(|r| r.id).collect::<Vec<_>>();

        // 3. Draw join codes until one is unused. The store's uniqueness
        //    constraint closes the check-then-insert race; a lost insert race
        //    redraws within the same budget.
        for attempt in 1..=MAX_JOIN_CODE_ATTEMPTS {
            let join_code = JoinCode::random();

            if self
                .sessions
                .find_active_by_join_code(&join_code)
                .await?
                .is_some()
            {
                tracing::debug!(
                    operation = "create_session",
                    attempt,
                    "join code already in use, redrawing"
                );
                continue;
            }

            let session = Session::new(
                SessionId::new(),
                cmd.creator_id,
                area,
                join_code,
                candidate_ids.clone(),
            );

            match self.sessions.insert(&session).await {
                Ok(()) => {
                    tracing::info!(
                        operation = "create_session",
                        session_id = %session.id(),
                        creator_id = %cmd.creator_id,
                        candidates = session.restaurants().len(),
                        "session created"
                    );
                    return Ok(session);
                }
                Err(e) if e.code == ErrorCode::DuplicateJoinCode => {
                    tracing::debug!(
                        operation = "create_session",
                        attempt,
                        "lost join code insert race, redrawing"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        operation = "create_session",
                        creator_id = %cmd.creator_id,
                        error = %e,
                        "session insert failed"
                    );
                    return Err(e.into());
                }
            }
        }

        tracing::error!(
            operation = "create_session",
            creator_id = %cmd.creator_id,
            "exhausted join code attempts"
        );
        Err(SessionError::JoinCodeExhausted)
    }
}
