use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use study_core::model::{BatchCard, DeckId, DeckSummary, FlashcardId, Rating, StudyCard};

use crate::ports::{
    ApiError, AuthStatus, Authenticator, CardProvider, Credentials, DeckDirectory, ReviewReceipt,
    ReviewSink,
};

#[derive(Default)]
struct State {
    decks: Vec<DeckSummary>,
    batches: HashMap<DeckId, Vec<BatchCard>>,
    batch_failures: HashMap<DeckId, ApiError>,
    review_failures: VecDeque<ApiError>,
    reviews: Vec<(FlashcardId, Rating)>,
    users: HashMap<String, String>,
    signed_in_as: Option<String>,
    authenticated: bool,
}

/// Scriptable stand-in for the server, used by tests and offline demos.
///
/// Clones share state, so a test can keep a handle while the controller owns
/// another.
#[derive(Clone)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryApi {
    /// A fake with an authenticated session and no decks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                authenticated: true,
                ..State::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a deck and the batch the server would hand out for it.
    #[must_use]
    pub fn with_deck(self, deck: DeckSummary, cards: Vec<StudyCard>) -> Self {
        let batch = cards.into_iter().map(BatchCard::from).collect();
        self.with_batch(deck, batch)
    }

    /// Like `with_deck`, but allows malformed slots in the batch.
    #[must_use]
    pub fn with_batch(self, deck: DeckSummary, batch: Vec<BatchCard>) -> Self {
        {
            let mut state = self.state();
            state.batches.insert(deck.id(), batch);
            state.decks.retain(|d| d.id() != deck.id());
            state.decks.push(deck);
        }
        self
    }

    #[must_use]
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.state()
            .users
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Make every following batch fetch for `deck_id` fail with `error`.
    pub fn fail_batch(&self, deck_id: DeckId, error: ApiError) {
        self.state().batch_failures.insert(deck_id, error);
    }

    /// Queue a failure for the next review submission.
    pub fn fail_next_review(&self, error: ApiError) {
        self.state().review_failures.push_back(error);
    }

    /// Drop the session; later calls answer `Unauthorized` until a login.
    pub fn sign_out(&self) {
        let mut state = self.state();
        state.authenticated = false;
        state.signed_in_as = None;
    }

    /// Reviews accepted so far, in submission order.
    #[must_use]
    pub fn submitted_reviews(&self) -> Vec<(FlashcardId, Rating)> {
        self.state().reviews.clone()
    }

    fn require_session(state: &State) -> Result<(), ApiError> {
        if state.authenticated {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

#[async_trait]
impl CardProvider for InMemoryApi {
    async fn due_cards(&self, deck_id: DeckId) -> Result<Vec<BatchCard>, ApiError> {
        let state = self.state();
        Self::require_session(&state)?;
        if let Some(err) = state.batch_failures.get(&deck_id) {
            return Err(err.clone());
        }
        state
            .batches
            .get(&deck_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl ReviewSink for InMemoryApi {
    async fn submit_review(
        &self,
        flashcard_id: FlashcardId,
        rating: Rating,
    ) -> Result<ReviewReceipt, ApiError> {
        let mut state = self.state();
        Self::require_session(&state)?;
        if let Some(err) = state.review_failures.pop_front() {
            return Err(err);
        }
        let known = state
            .batches
            .values()
            .flatten()
            .any(|slot| slot.flashcard_id() == Some(flashcard_id));
        if !known {
            return Err(ApiError::NotFound);
        }
        state.reviews.push((flashcard_id, rating));
        Ok(ReviewReceipt::new(flashcard_id))
    }
}

#[async_trait]
impl DeckDirectory for InMemoryApi {
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, ApiError> {
        let state = self.state();
        Self::require_session(&state)?;
        Ok(state.decks.clone())
    }

    async fn deck_name(&self, deck_id: DeckId) -> Result<String, ApiError> {
        let state = self.state();
        Self::require_session(&state)?;
        state
            .decks
            .iter()
            .find(|deck| deck.id() == deck_id)
            .map(|deck| deck.name().to_string())
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl Authenticator for InMemoryApi {
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let mut state = self.state();
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Email and password required".into(),
            });
        }
        match state.users.get(credentials.email.trim()) {
            Some(password) if *password == credentials.password => {
                state.authenticated = true;
                state.signed_in_as = Some(credentials.email.trim().to_string());
                Ok(())
            }
            _ => Err(ApiError::Unauthorized),
        }
    }

    async fn check_auth(&self) -> Result<AuthStatus, ApiError> {
        let state = self.state();
        Ok(AuthStatus {
            authenticated: state.authenticated,
            username: None,
            email: state.signed_in_as.clone(),
        })
    }
}
