use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::{Api, CardProvider, DeckDirectory, ReviewSink};
use study_core::model::{DeckId, Rating};
use tracing::{debug, info, warn};

use super::state::{
    LoadOutcome, LoadTicket, ReviewOutcome, ReviewTicket, SessionSnapshot, StudySession,
};
use crate::Clock;
use crate::error::SessionError;

/// Drives a `StudySession` against the server.
///
/// The session lock is only taken around the synchronous state transitions,
/// never across a request, so a deck switch can land while a fetch or a
/// review is still in flight. The generation check in `StudySession` keeps
/// such late responses out.
pub struct StudyController {
    clock: Clock,
    cards: Arc<dyn CardProvider>,
    reviews: Arc<dyn ReviewSink>,
    decks: Arc<dyn DeckDirectory>,
    session: Mutex<StudySession>,
}

impl StudyController {
    #[must_use]
    pub fn new(clock: Clock, api: &Api) -> Self {
        Self {
            clock,
            cards: Arc::clone(&api.cards),
            reviews: Arc::clone(&api.reviews),
            decks: Arc::clone(&api.decks),
            session: Mutex::new(StudySession::new()),
        }
    }

    fn session(&self) -> MutexGuard<'_, StudySession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    /// Reset to `deck_id` and return the ticket for its batch, or `None` when
    /// the selection was cleared.
    pub fn begin_select(&self, deck_id: Option<DeckId>) -> Option<LoadTicket> {
        self.session().select_deck(deck_id)
    }

    /// Fetch the batch and then the deck title for a ticket from
    /// `begin_select`.
    pub async fn load(&self, ticket: LoadTicket) -> LoadOutcome {
        let result = self.cards.due_cards(ticket.deck_id).await;
        let outcome = self
            .session()
            .apply_batch(ticket, result, self.clock.now());

        match &outcome {
            LoadOutcome::Stale | LoadOutcome::AuthRequired { .. } => return outcome,
            LoadOutcome::Presenting { total } => {
                info!(deck_id = %ticket.deck_id, total, "study batch loaded");
            }
            LoadOutcome::NothingDue => {
                info!(deck_id = %ticket.deck_id, "no cards due");
            }
            LoadOutcome::Failed(err) => {
                warn!(deck_id = %ticket.deck_id, %err, "study batch failed to load");
            }
        }

        let title = self.decks.deck_name(ticket.deck_id).await;
        self.session().apply_title(ticket, title);
        outcome
    }

    /// `begin_select` followed by `load`.
    pub async fn select_deck(&self, deck_id: Option<DeckId>) -> Option<LoadOutcome> {
        let ticket = self.begin_select(deck_id)?;
        Some(self.load(ticket).await)
    }

    /// # Errors
    ///
    /// Returns `SessionError` when no well-formed card is on screen or a
    /// review is in flight.
    pub fn toggle_flip(&self) -> Result<bool, SessionError> {
        self.session().toggle_flip()
    }

    /// Mark the current card as submitting and return its ticket.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the card cannot be rated yet.
    pub fn begin_review(&self, rating: Rating) -> Result<ReviewTicket, SessionError> {
        self.session().begin_review(rating)
    }

    /// Post the rating named by `ticket` and apply the response.
    pub async fn send_review(&self, ticket: ReviewTicket) -> ReviewOutcome {
        let result = self
            .reviews
            .submit_review(ticket.flashcard_id, ticket.rating)
            .await;
        let outcome = self
            .session()
            .apply_review(ticket, result, self.clock.now());

        match &outcome {
            ReviewOutcome::Advanced { cursor } => {
                debug!(flashcard_id = %ticket.flashcard_id, rating = %ticket.rating, cursor, "card reviewed");
            }
            ReviewOutcome::Completed { reviewed } => {
                info!(reviewed, "study session complete");
            }
            ReviewOutcome::Failed(err) => {
                warn!(flashcard_id = %ticket.flashcard_id, %err, "review not recorded");
            }
            ReviewOutcome::AuthRequired { .. } | ReviewOutcome::Stale => {}
        }
        outcome
    }

    /// `begin_review` followed by `send_review`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the card cannot be rated yet; nothing is
    /// sent in that case.
    pub async fn submit_rating(&self, rating: Rating) -> Result<ReviewOutcome, SessionError> {
        let ticket = self.begin_review(rating)?;
        Ok(self.send_review(ticket).await)
    }
}
