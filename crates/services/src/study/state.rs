use std::fmt;

use api::{ApiError, ReviewReceipt, study_path};
use chrono::{DateTime, Utc};
use study_core::model::{BatchCard, DeckId, FlashcardId, Rating};
use tracing::debug;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// No deck selected.
    #[default]
    Idle,
    Loading,
    Presenting,
    /// A rating is in flight; controls are disabled.
    Submitting,
    Complete,
    /// The deck has no cards due. Not an error.
    NothingDue,
    Failed(ApiError),
    /// The server asked for a login; `return_to` is the page to come back to.
    AuthRequired { return_to: String },
}

impl Phase {
    /// True while a batch is on screen.
    #[must_use]
    pub fn has_batch(&self) -> bool {
        matches!(self, Phase::Presenting | Phase::Submitting | Phase::Complete)
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Deck, batch and cursor for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    deck_id: Option<DeckId>,
    cards: Vec<BatchCard>,
    cursor: usize,
    is_flipped: bool,
}

impl SessionState {
    fn for_deck(deck_id: Option<DeckId>) -> Self {
        Self {
            deck_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn deck_id(&self) -> Option<DeckId> {
        self.deck_id
    }

    #[must_use]
    pub fn cards(&self) -> &[BatchCard] {
        &self.cards
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    fn current(&self) -> Option<&BatchCard> {
        self.cards.get(self.cursor)
    }
}

/// Successful reviews per rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl RatingTally {
    fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Hard => self.hard += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
    }

    #[must_use]
    pub fn count(&self, rating: Rating) -> u32 {
        match rating {
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.hard + self.good + self.easy
    }
}

//
// ─── TICKETS & OUTCOMES ────────────────────────────────────────────────────────
//

/// Issued by `select_deck`; the batch response must come back with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub deck_id: DeckId,
}

/// Issued by `begin_review`; names exactly the card on screen when rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTicket {
    pub generation: u64,
    pub cursor: usize,
    pub flashcard_id: FlashcardId,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Presenting { total: usize },
    NothingDue,
    Failed(ApiError),
    AuthRequired { return_to: String },
    /// The user selected another deck while this batch was in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Advanced { cursor: usize },
    Completed { reviewed: usize },
    Failed(ApiError),
    AuthRequired { return_to: String },
    Stale,
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub phase: Phase,
    pub deck_id: Option<DeckId>,
    pub deck_title: Option<String>,
    pub current: Option<BatchCard>,
    pub cursor: usize,
    pub total: usize,
    pub is_flipped: bool,
    pub progress: Option<f64>,
    /// Last review failure, cleared by the next attempt.
    pub notice: Option<ApiError>,
    /// Server message from the last accepted review.
    pub last_message: Option<String>,
    pub tally: RatingTally,
}

impl SessionSnapshot {
    #[must_use]
    pub fn reviewed(&self) -> u32 {
        self.tally.total()
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Study-session state machine.
///
/// Holds no I/O. Each network step is split in two: a `begin`/`select` call
/// that hands out a ticket stamped with the current generation, and an
/// `apply` call that folds the response back in. Responses whose ticket no
/// longer matches the generation are dropped.
#[derive(Clone, Default)]
pub struct StudySession {
    state: SessionState,
    phase: Phase,
    generation: u64,
    deck_title: Option<String>,
    notice: Option<ApiError>,
    last_message: Option<String>,
    tally: RatingTally,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn deck_title(&self) -> Option<&str> {
        self.deck_title.as_deref()
    }

    #[must_use]
    pub fn tally(&self) -> RatingTally {
        self.tally
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Switch to another deck, or back to idle with `None`.
    ///
    /// Discards the previous batch and invalidates every outstanding ticket.
    pub fn select_deck(&mut self, deck_id: Option<DeckId>) -> Option<LoadTicket> {
        self.generation += 1;
        self.state = SessionState::for_deck(deck_id);
        self.deck_title = None;
        self.notice = None;
        self.last_message = None;
        self.tally = RatingTally::default();
        self.started_at = None;
        self.completed_at = None;

        match deck_id {
            Some(deck_id) => {
                self.phase = Phase::Loading;
                Some(LoadTicket {
                    generation: self.generation,
                    deck_id,
                })
            }
            None => {
                self.phase = Phase::Idle;
                None
            }
        }
    }

    /// Fold a batch response into the session.
    pub fn apply_batch(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<BatchCard>, ApiError>,
        now: DateTime<Utc>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || self.phase != Phase::Loading {
            debug!(deck_id = %ticket.deck_id, generation = ticket.generation, "discarding stale batch");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(cards) if cards.is_empty() => {
                self.phase = Phase::NothingDue;
                LoadOutcome::NothingDue
            }
            Ok(cards) => {
                let total = cards.len();
                self.state.cards = cards;
                self.state.cursor = 0;
                self.state.is_flipped = false;
                self.started_at = Some(now);
                self.phase = Phase::Presenting;
                LoadOutcome::Presenting { total }
            }
            Err(ApiError::NotFound) => {
                self.phase = Phase::NothingDue;
                LoadOutcome::NothingDue
            }
            Err(ApiError::Unauthorized) => {
                let return_to = study_path(Some(ticket.deck_id));
                self.phase = Phase::AuthRequired {
                    return_to: return_to.clone(),
                };
                LoadOutcome::AuthRequired { return_to }
            }
            Err(err) => {
                self.phase = Phase::Failed(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Set the heading for the selected deck. Falls back to the raw id when
    /// the name lookup failed. Returns false for a stale ticket.
    pub fn apply_title(&mut self, ticket: LoadTicket, result: Result<String, ApiError>) -> bool {
        if ticket.generation != self.generation {
            debug!(deck_id = %ticket.deck_id, "discarding stale deck title");
            return false;
        }
        let title = result.unwrap_or_else(|err| {
            debug!(deck_id = %ticket.deck_id, %err, "deck title unavailable");
            format!("Deck ID: {}", ticket.deck_id)
        });
        self.deck_title = Some(title);
        true
    }

    /// Show the other face of the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while a rating is in flight,
    /// `SessionError::NotPresenting` without a card on screen and
    /// `SessionError::MalformedCard` when the card cannot be shown.
    pub fn toggle_flip(&mut self) -> Result<bool, SessionError> {
        self.presentable_card()?;
        self.state.is_flipped = !self.state.is_flipped;
        Ok(self.state.is_flipped)
    }

    /// Lock the session for a rating of the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFlipped` before the back has been shown, plus
    /// the errors of `toggle_flip`.
    pub fn begin_review(&mut self, rating: Rating) -> Result<ReviewTicket, SessionError> {
        let flashcard_id = self.presentable_card()?;
        if !self.state.is_flipped {
            return Err(SessionError::NotFlipped);
        }

        self.phase = Phase::Submitting;
        self.notice = None;
        Ok(ReviewTicket {
            generation: self.generation,
            cursor: self.state.cursor,
            flashcard_id,
            rating,
        })
    }

    fn presentable_card(&self) -> Result<FlashcardId, SessionError> {
        match self.phase {
            Phase::Presenting => {}
            Phase::Submitting => return Err(SessionError::Busy),
            _ => return Err(SessionError::NotPresenting),
        }
        match self.state.current() {
            Some(BatchCard::Ready(card)) => Ok(card.flashcard_id()),
            Some(BatchCard::Malformed(bad)) => Err(SessionError::MalformedCard(bad.error)),
            None => Err(SessionError::NotPresenting),
        }
    }

    /// Fold a review response into the session.
    ///
    /// Only success moves the cursor. Failures return to `Presenting` with the
    /// same card so the user can retry.
    pub fn apply_review(
        &mut self,
        ticket: ReviewTicket,
        result: Result<ReviewReceipt, ApiError>,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        if ticket.generation != self.generation
            || ticket.cursor != self.state.cursor
            || self.phase != Phase::Submitting
        {
            debug!(flashcard_id = %ticket.flashcard_id, "discarding stale review response");
            return ReviewOutcome::Stale;
        }

        match result {
            Ok(receipt) => {
                self.tally.record(ticket.rating);
                self.last_message = receipt.message;
                self.state.cursor += 1;
                self.state.is_flipped = false;
                if self.state.cursor >= self.state.cards.len() {
                    self.phase = Phase::Complete;
                    self.completed_at = Some(now);
                    ReviewOutcome::Completed {
                        reviewed: self.state.cursor,
                    }
                } else {
                    self.phase = Phase::Presenting;
                    ReviewOutcome::Advanced {
                        cursor: self.state.cursor,
                    }
                }
            }
            Err(ApiError::Unauthorized) => {
                self.phase = Phase::Presenting;
                ReviewOutcome::AuthRequired {
                    return_to: study_path(self.state.deck_id),
                }
            }
            Err(err) => {
                self.phase = Phase::Presenting;
                self.notice = Some(err.clone());
                ReviewOutcome::Failed(err)
            }
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.state.cards.len();
        SessionProgress {
            total,
            reviewed: self.state.cursor,
            remaining: total.saturating_sub(self.state.cursor),
            is_complete: self.phase == Phase::Complete,
        }
    }

    /// Progress bar fraction, `None` when no batch is on screen.
    #[must_use]
    pub fn progress_fraction(&self) -> Option<f64> {
        if self.phase.has_batch() {
            self.progress().fraction()
        } else {
            None
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let current = match self.phase {
            Phase::Presenting | Phase::Submitting => self.state.current().cloned(),
            _ => None,
        };
        SessionSnapshot {
            generation: self.generation,
            phase: self.phase.clone(),
            deck_id: self.state.deck_id,
            deck_title: self.deck_title.clone(),
            current,
            cursor: self.state.cursor,
            total: self.state.cards.len(),
            is_flipped: self.state.is_flipped,
            progress: self.progress_fraction(),
            notice: self.notice.clone(),
            last_message: self.last_message.clone(),
            tally: self.tally,
        }
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("deck_id", &self.state.deck_id)
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("cursor", &self.state.cursor)
            .field("total", &self.state.cards.len())
            .field("is_flipped", &self.state.is_flipped)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{CardError, MalformedCard, StudyCard};
    use study_core::time::fixed_now;

    fn card(id: u64) -> BatchCard {
        BatchCard::from(StudyCard::new(
            FlashcardId::new(id),
            format!("front {id}"),
            format!("back {id}"),
        ))
    }

    fn loaded(cards: Vec<BatchCard>) -> StudySession {
        let mut session = StudySession::new();
        let ticket = session.select_deck(Some(DeckId::new(1))).unwrap();
        session.apply_batch(ticket, Ok(cards), fixed_now());
        session
    }

    fn review(session: &mut StudySession, rating: Rating) -> ReviewOutcome {
        session.toggle_flip().unwrap();
        let ticket = session.begin_review(rating).unwrap();
        let receipt = ReviewReceipt::new(ticket.flashcard_id);
        session.apply_review(ticket, Ok(receipt), fixed_now())
    }

    #[test]
    fn new_session_is_idle_without_progress() {
        let session = StudySession::new();
        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(session.progress_fraction(), None);
        assert!(session.snapshot().current.is_none());
    }

    #[test]
    fn clearing_the_deck_returns_to_idle() {
        let mut session = loaded(vec![card(1)]);
        assert!(session.select_deck(None).is_none());
        assert_eq!(session.phase(), &Phase::Idle);
        assert!(session.state().cards().is_empty());
    }

    #[test]
    fn batch_starts_at_first_card_unflipped() {
        let session = loaded(vec![card(1), card(2)]);
        assert_eq!(session.phase(), &Phase::Presenting);
        assert_eq!(session.state().cursor(), 0);
        assert!(!session.state().is_flipped());
        assert_eq!(session.progress_fraction(), Some(0.5));
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn empty_batch_and_not_found_mean_nothing_due() {
        let mut session = StudySession::new();
        let ticket = session.select_deck(Some(DeckId::new(1))).unwrap();
        assert_eq!(
            session.apply_batch(ticket, Ok(vec![]), fixed_now()),
            LoadOutcome::NothingDue
        );
        assert_eq!(session.progress_fraction(), None);

        let ticket = session.select_deck(Some(DeckId::new(2))).unwrap();
        assert_eq!(
            session.apply_batch(ticket, Err(ApiError::NotFound), fixed_now()),
            LoadOutcome::NothingDue
        );
        assert_eq!(
            session.toggle_flip().unwrap_err(),
            SessionError::NotPresenting
        );
    }

    #[test]
    fn unauthorized_batch_asks_for_login_with_return_path() {
        let mut session = StudySession::new();
        let ticket = session.select_deck(Some(DeckId::new(3))).unwrap();
        let outcome = session.apply_batch(ticket, Err(ApiError::Unauthorized), fixed_now());
        assert_eq!(
            outcome,
            LoadOutcome::AuthRequired {
                return_to: "/study?deck_id=3".into()
            }
        );
    }

    #[test]
    fn other_batch_errors_fail_the_load() {
        let mut session = StudySession::new();
        let ticket = session.select_deck(Some(DeckId::new(3))).unwrap();
        let err = ApiError::Transport("connection refused".into());
        session.apply_batch(ticket, Err(err.clone()), fixed_now());
        assert_eq!(session.phase(), &Phase::Failed(err));
    }

    #[test]
    fn rating_requires_flip() {
        let mut session = loaded(vec![card(1)]);
        assert_eq!(
            session.begin_review(Rating::Good).unwrap_err(),
            SessionError::NotFlipped
        );
        assert_eq!(session.phase(), &Phase::Presenting);
    }

    #[test]
    fn second_rating_while_submitting_is_busy() {
        let mut session = loaded(vec![card(1), card(2)]);
        session.toggle_flip().unwrap();
        session.begin_review(Rating::Good).unwrap();
        assert_eq!(
            session.begin_review(Rating::Easy).unwrap_err(),
            SessionError::Busy
        );
        assert_eq!(session.toggle_flip().unwrap_err(), SessionError::Busy);
    }

    #[test]
    fn ticket_names_the_card_under_the_cursor() {
        let mut session = loaded(vec![card(10), card(20)]);
        review(&mut session, Rating::Good);
        session.toggle_flip().unwrap();
        let ticket = session.begin_review(Rating::Hard).unwrap();
        assert_eq!(ticket.cursor, 1);
        assert_eq!(ticket.flashcard_id, FlashcardId::new(20));
    }

    #[test]
    fn success_advances_and_resets_flip() {
        let mut session = loaded(vec![card(1), card(2)]);
        assert_eq!(
            review(&mut session, Rating::Easy),
            ReviewOutcome::Advanced { cursor: 1 }
        );
        assert!(!session.state().is_flipped());
        assert_eq!(session.progress_fraction(), Some(1.0));
        assert_eq!(session.tally().easy, 1);
    }

    #[test]
    fn last_success_completes() {
        let mut session = loaded(vec![card(1)]);
        assert_eq!(
            review(&mut session, Rating::Hard),
            ReviewOutcome::Completed { reviewed: 1 }
        );
        assert_eq!(session.phase(), &Phase::Complete);
        assert_eq!(session.state().cursor(), session.state().cards().len());
        assert_eq!(session.progress_fraction(), Some(1.0));
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.snapshot().current.is_none());
    }

    #[test]
    fn failure_keeps_cursor_and_reenables() {
        let mut session = loaded(vec![card(1), card(2)]);
        session.toggle_flip().unwrap();
        let ticket = session.begin_review(Rating::Good).unwrap();
        let err = ApiError::Rejected {
            status: 500,
            message: "db down".into(),
        };
        let outcome = session.apply_review(ticket, Err(err.clone()), fixed_now());
        assert_eq!(outcome, ReviewOutcome::Failed(err.clone()));
        assert_eq!(session.phase(), &Phase::Presenting);
        assert_eq!(session.state().cursor(), 0);
        assert!(session.state().is_flipped());
        assert_eq!(session.snapshot().notice, Some(err));

        // Manual retry clears the notice.
        session.begin_review(Rating::Good).unwrap();
        assert_eq!(session.snapshot().notice, None);
    }

    #[test]
    fn unauthorized_review_keeps_card() {
        let mut session = loaded(vec![card(1)]);
        session.toggle_flip().unwrap();
        let ticket = session.begin_review(Rating::Good).unwrap();
        let outcome = session.apply_review(ticket, Err(ApiError::Unauthorized), fixed_now());
        assert_eq!(
            outcome,
            ReviewOutcome::AuthRequired {
                return_to: "/study?deck_id=1".into()
            }
        );
        assert_eq!(session.phase(), &Phase::Presenting);
        assert_eq!(session.state().cursor(), 0);
    }

    #[test]
    fn stale_batch_is_discarded() {
        let mut session = StudySession::new();
        let old = session.select_deck(Some(DeckId::new(1))).unwrap();
        let new = session.select_deck(Some(DeckId::new(2))).unwrap();

        assert_eq!(
            session.apply_batch(old, Ok(vec![card(1)]), fixed_now()),
            LoadOutcome::Stale
        );
        assert_eq!(session.phase(), &Phase::Loading);
        assert!(!session.apply_title(old, Ok("Old".into())));

        session.apply_batch(new, Ok(vec![card(2)]), fixed_now());
        assert_eq!(
            session.snapshot().current.and_then(|c| c.flashcard_id()),
            Some(FlashcardId::new(2))
        );
    }

    #[test]
    fn stale_review_is_discarded() {
        let mut session = loaded(vec![card(1), card(2)]);
        session.toggle_flip().unwrap();
        let ticket = session.begin_review(Rating::Good).unwrap();

        let reload = session.select_deck(Some(DeckId::new(1))).unwrap();
        session.apply_batch(reload, Ok(vec![card(5)]), fixed_now());

        let receipt = ReviewReceipt::new(ticket.flashcard_id);
        assert_eq!(
            session.apply_review(ticket, Ok(receipt), fixed_now()),
            ReviewOutcome::Stale
        );
        assert_eq!(session.state().cursor(), 0);
        assert_eq!(session.tally().total(), 0);
    }

    #[test]
    fn title_falls_back_to_deck_id() {
        let mut session = StudySession::new();
        let ticket = session.select_deck(Some(DeckId::new(9))).unwrap();
        assert!(session.apply_title(ticket, Err(ApiError::NotFound)));
        assert_eq!(session.deck_title(), Some("Deck ID: 9"));
    }

    #[test]
    fn malformed_slot_blocks_rating_but_not_selection() {
        let bad = BatchCard::Malformed(MalformedCard {
            flashcard_id: Some(FlashcardId::new(1)),
            error: CardError::MissingBack,
        });
        let mut session = loaded(vec![bad, card(2)]);
        assert_eq!(
            session.toggle_flip().unwrap_err(),
            SessionError::MalformedCard(CardError::MissingBack)
        );
        assert_eq!(
            session.begin_review(Rating::Good).unwrap_err(),
            SessionError::MalformedCard(CardError::MissingBack)
        );
        assert!(session.snapshot().current.is_some_and(|c| c.is_malformed()));
        assert!(session.select_deck(Some(DeckId::new(2))).is_some());
    }
}
