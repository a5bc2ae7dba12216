//! Session aggregate entity.
//!
//! A session is one group matching event: a creator anchors it at a search
//! area, participants join by invitation or join code, everyone swipes on the
//! candidate restaurants, and finalization commits a single winner.
//!
//! # Invariants
//!
//! - `join_code` is unique among non-completed sessions (store-enforced)
//! - `participants` contains no duplicate user id
//! - `total_votes >= positive_votes >= 0` for every tally; `score` is derived
//! - a `Completed` session accepts no further mutations

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, JoinCode, RestaurantId, SearchArea, SessionId, SessionStatus,
    Timestamp, UserId,
};

/// Sessions expire this long after creation.
pub const SESSION_TTL_MINUTES: i64 = 20;

/// Minimum votes a restaurant needs before it is eligible for selection.
///
/// When no candidate reaches this sample size, ranking falls back to every
/// candidate with at least one vote so small sessions still conclude.
pub const MIN_VOTES_FOR_SELECTION: u32 = 2;

/// One recorded swipe: a participant's like/dislike on a single restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    pub restaurant_id: RestaurantId,
    pub liked: bool,
    pub swiped_at: Timestamp,
}

/// A user who has joined the session and may cast votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    user_id: UserId,
    preferences: Vec<Swipe>,
    done_swiping: bool,
}

impl Participant {
    /// Creates a participant with no recorded swipes.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            preferences: Vec::new(),
            done_swiping: false,
        }
    }

    /// Returns the participant's user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the append-only swipe history.
    pub fn preferences(&self) -> &[Swipe] {
        &self.preferences
    }

    /// Returns true once the participant has finished swiping.
    pub fn is_done_swiping(&self) -> bool {
        self.done_swiping
    }
}

/// Vote counters for one candidate restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantTally {
    restaurant_id: RestaurantId,
    score: f64,
    total_votes: u32,
    positive_votes: u32,
}

impl RestaurantTally {
    /// Creates a zeroed tally for a candidate.
    pub fn new(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id,
            score: 0.0,
            total_votes: 0,
            positive_votes: 0,
        }
    }

    /// Reconstitutes a tally from persistence.
    pub fn reconstitute(
        restaurant_id: RestaurantId,
        total_votes: u32,
        positive_votes: u32,
    ) -> Self {
        let score = if total_votes == 0 {
            0.0
        } else {
            f64::from(positive_votes) / f64::from(total_votes)
        };
        Self {
            restaurant_id,
            score,
            total_votes,
            positive_votes,
        }
    }

    /// Returns the candidate's restaurant id.
    pub fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }

    /// Positive votes over total votes; 0.0 before any vote.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Total votes cast on this candidate.
    pub fn total_votes(&self) -> u32 {
        self.total_votes
    }

    /// Positive (liked) votes cast on this candidate.
    pub fn positive_votes(&self) -> u32 {
        self.positive_votes
    }

    fn apply_vote(&mut self, liked: bool) {
        self.total_votes += 1;
        if liked {
            self.positive_votes += 1;
        }
        self.score = f64::from(self.positive_votes) / f64::from(self.total_votes);
    }
}

/// The committed outcome of a finalized session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSelection {
    pub restaurant_id: RestaurantId,
    pub selected_at: Timestamp,
}

/// Session aggregate - one group matching event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, assigned at creation.
    id: SessionId,

    /// Human-shareable code for joining.
    join_code: JoinCode,

    /// User who started the session.
    creator: UserId,

    /// Geographic anchor; immutable once set.
    area: SearchArea,

    /// Current lifecycle status.
    status: SessionStatus,

    /// Joined users, creator first. No duplicates.
    participants: Vec<Participant>,

    /// Users invited but not yet accepted.
    pending_invitations: Vec<UserId>,

    /// One tally per candidate restaurant found at creation.
    restaurants: Vec<RestaurantTally>,

    /// Set once at finalization.
    final_selection: Option<FinalSelection>,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session expires.
    expires_at: Timestamp,

    /// Optimistic-concurrency token, bumped per persisted mutation.
    version: i64,
}

impl Session {
    /// Creates a new session with the creator as sole participant and a
    /// zeroed tally per candidate restaurant.
    pub fn new(
        id: SessionId,
        creator: UserId,
        area: SearchArea,
        join_code: JoinCode,
        candidates: Vec<RestaurantId>,
    ) -> Self {
        let created_at = Timestamp::now();
        Self {
            id,
            join_code,
            creator,
            area,
            status: SessionStatus::Created,
            participants: vec![Participant::new(creator)],
            pending_invitations: Vec::new(),
            restaurants: candidates.into_iter().map(RestaurantTally::new).collect(),
            final_selection: None,
            created_at,
            expires_at: created_at.plus_minutes(SESSION_TTL_MINUTES),
            version: 1,
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        join_code: JoinCode,
        creator: UserId,
        area: SearchArea,
        status: SessionStatus,
        participants: Vec<Participant>,
        pending_invitations: Vec<UserId>,
        restaurants: Vec<RestaurantTally>,
        final_selection: Option<FinalSelection>,
        created_at: Timestamp,
        expires_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            join_code,
            creator,
            area,
            status,
            participants,
            pending_invitations,
            restaurants,
            final_selection,
            created_at,
            expires_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the join code.
    pub fn join_code(&self) -> &JoinCode {
        &self.join_code
    }

    /// Returns the creator's user ID.
    pub fn creator(&self) -> &UserId {
        &self.creator
    }

    /// Returns the search area.
    pub fn area(&self) -> &SearchArea {
        &self.area
    }

    /// Returns the current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the participants, creator first.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns users invited but not yet accepted.
    pub fn pending_invitations(&self) -> &[UserId] {
        &self.pending_invitations
    }

    /// Returns the candidate tallies.
    pub fn restaurants(&self) -> &[RestaurantTally] {
        &self.restaurants
    }

    /// Returns the committed outcome, if finalized.
    pub fn final_selection(&self) -> Option<&FinalSelection> {
        self.final_selection.as_ref()
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session expires.
    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    /// Returns the optimistic-concurrency token.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Checks whether the given user has joined the session.
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.user_id == user_id)
    }

    /// Checks whether the session has passed its expiry time.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Sets the persisted version token after a successful store update.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Invites a user: they become a participant immediately and are tracked
    /// as pending until they accept by joining.
    ///
    /// Idempotent: inviting an existing participant is a no-op.
    /// Returns true if the user was newly added.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    pub fn invite(&mut self, user_id: UserId) -> Result<bool, DomainError> {
        self.ensure_mutable()?;

        if self.is_participant(&user_id) {
            return Ok(false);
        }

        self.participants.push(Participant::new(user_id));
        if !self.pending_invitations.contains(&user_id) {
            self.pending_invitations.push(user_id);
        }
        Ok(true)
    }

    /// Joins a user who entered via join code, clearing any pending
    /// invitation for them.
    ///
    /// Idempotent: joining twice leaves a single participant entry.
    /// Returns true if the user was newly added.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    pub fn join(&mut self, user_id: UserId) -> Result<bool, DomainError> {
        self.ensure_mutable()?;

        self.pending_invitations.retain(|u| u != &user_id);
        if self.is_participant(&user_id) {
            return Ok(false);
        }

        self.participants.push(Participant::new(user_id));
        Ok(true)
    }

    /// Records one swipe: appends to the participant's history and updates
    /// the restaurant's tally. The first swipe moves the session from
    /// `Created` to `Matching`.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `ParticipantNotFound` if the user has not joined
    /// - `RestaurantNotInSession` if the restaurant is not a candidate
    pub fn record_swipe(
        &mut self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
        liked: bool,
    ) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.user_id == user_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ParticipantNotFound,
                    format!("User {} is not a participant", user_id),
                )
            })?;

        let tally = self
            .restaurants
            .iter_mut()
            .find(|r| &r.restaurant_id == restaurant_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::RestaurantNotInSession,
                    format!("Restaurant {} is not a session candidate", restaurant_id),
                )
            })?;

        participant.preferences.push(Swipe {
            restaurant_id: *restaurant_id,
            liked,
            swiped_at: Timestamp::now(),
        });
        tally.apply_vote(liked);

        if self.status == SessionStatus::Created {
            self.status = SessionStatus::Matching;
        }
        Ok(())
    }

    /// Marks the participant as finished swiping. Idempotent.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `ParticipantNotFound` if the user has not joined
    pub fn mark_done_swiping(&mut self, user_id: &UserId) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.user_id == user_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ParticipantNotFound,
                    format!("User {} is not a participant", user_id),
                )
            })?;

        participant.done_swiping = true;
        Ok(())
    }

    /// Closes voting: ranks the candidates, commits the winner (if any
    /// candidate received votes), and transitions to `Completed`.
    ///
    /// Ranking: highest positive/total ratio among candidates with at least
    /// [`MIN_VOTES_FOR_SELECTION`] votes; if none qualify, every candidate
    /// with at least one vote is ranked. Ties go to the higher vote count,
    /// then to the earlier candidate.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is already completed
    pub fn finalize(&mut self) -> Result<Option<RestaurantId>, DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Completed) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session is already completed",
            ));
        }

        let winner = self.select_winner();
        self.final_selection = winner.map(|restaurant_id| FinalSelection {
            restaurant_id,
            selected_at: Timestamp::now(),
        });
        self.status = SessionStatus::Completed;
        Ok(winner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn select_winner(&self) -> Option<RestaurantId> {
        let eligible: Vec<&RestaurantTally> = self
            .restaurants
            .iter()
            .filter(|r| r.total_votes >= MIN_VOTES_FOR_SELECTION)
            .collect();

        let pool: Vec<&RestaurantTally> = if eligible.is_empty() {
            self.restaurants.iter().filter(|r| r.total_votes > 0).collect()
        } else {
            eligible
        };

        let mut winner: Option<&RestaurantTally> = None;
        for tally in pool {
            let better = match winner {
                None => true,
                Some(best) => {
                    tally.score > best.score
                        || (tally.score == best.score && tally.total_votes > best.total_votes)
                }
            };
            if better {
                winner = Some(tally);
            }
        }
        winner.map(|t| t.restaurant_id)
    }

    /// Validates that the session can be modified.
    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::SessionCompleted,
                "Cannot modify a completed session",
            ))
        }
    }
}
