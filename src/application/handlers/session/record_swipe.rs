//! RecordSwipeHandler - Command handler for applying one vote.

use std::sync::Arc;

use crate::domain::foundation::{RestaurantId, SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

use super::mutate::mutate_session;

/// Command recording one participant swipe.
#[derive(Debug, Clone)]
pub struct RecordSwipeCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub liked: bool,
}

/// Handler for recording swipes.
pub struct RecordSwipeHandler {
    sessions: Arc<dyn SessionStore>,
}

impl RecordSwipeHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: RecordSwipeCommand) -> Result<Session, SessionError> {
        let session = mutate_session(&self.sessions, &cmd.session_id, |s| {
            s.record_swipe(&cmd.user_id, &cmd.restaurant_id, cmd.liked)
        })
        .await?;

        tracing::info!(
            operation = "record_swipe",
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            restaurant_id = %cmd.restaurant_id,
            liked = cmd.liked,
            "swipe recorded"
        );
        Ok(session)
    }
}
