//! Session command and query handlers.

mod create_session;
mod finalize_session;
mod get_session;
mod invite_participant;
mod join_session;
mod list_user_sessions;
mod mark_done_swiping;
mod mutate;
mod record_swipe;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, MAX_JOIN_CODE_ATTEMPTS};
pub use finalize_session::{FinalizeSessionCommand, FinalizeSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use invite_participant::{InviteParticipantCommand, InviteParticipantHandler};
pub use join_session::{JoinSessionCommand, JoinSessionHandler};
pub use list_user_sessions::{ListUserSessionsHandler, ListUserSessionsQuery};
pub use mark_done_swiping::{MarkDoneSwipingCommand, MarkDoneSwipingHandler};
pub use mutate::MAX_UPDATE_ATTEMPTS;
pub use record_swipe::{RecordSwipeCommand, RecordSwipeHandler};
