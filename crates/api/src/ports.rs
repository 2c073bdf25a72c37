use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use study_core::model::{BatchCard, DeckId, DeckSummary, FlashcardId, Rating};
use thiserror::Error;

use crate::memory::InMemoryApi;

/// Errors surfaced by API adapters.
///
/// Transport and decode failures carry a rendered message rather than the
/// underlying error so the value can be stored in UI state and cloned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    /// Server-provided text when there is one, for showing to the user.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// What the server acknowledged after a review was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReceipt {
    pub flashcard_id: FlashcardId,
    pub points_earned: Option<u32>,
    pub message: Option<String>,
}

impl ReviewReceipt {
    #[must_use]
    pub fn new(flashcard_id: FlashcardId) -> Self {
        Self {
            flashcard_id,
            points_earned: None,
            message: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Source of due-card batches.
#[async_trait]
pub trait CardProvider: Send + Sync {
    /// Fetch the cards due today for a deck, in presentation order.
    ///
    /// Cards the server sent incompletely come back as `BatchCard::Malformed`
    /// at their original position.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the session expired and
    /// `ApiError::NotFound` when the deck is unknown or has nothing due.
    async fn due_cards(&self, deck_id: DeckId) -> Result<Vec<BatchCard>, ApiError>;
}

/// Destination for review ratings.
#[async_trait]
pub trait ReviewSink: Send + Sync {
    /// Record one rating for one flashcard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the server answers with a
    /// non-success payload, or a transport error.
    async fn submit_review(
        &self,
        flashcard_id: FlashcardId,
        rating: Rating,
    ) -> Result<ReviewReceipt, ApiError>;
}

/// Read access to the user's decks.
#[async_trait]
pub trait DeckDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, ApiError>;

    /// Display name of a single deck.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the deck is unknown or not accessible.
    async fn deck_name(&self, deck_id: DeckId) -> Result<String, ApiError>;
}

/// Session login against the server.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials and
    /// `ApiError::Rejected` for missing fields.
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport failures.
    async fn check_auth(&self) -> Result<AuthStatus, ApiError>;
}

/// Bundles every collaborator behind trait objects so the HTTP client and the
/// in-memory fake are interchangeable.
#[derive(Clone)]
pub struct Api {
    pub cards: Arc<dyn CardProvider>,
    pub reviews: Arc<dyn ReviewSink>,
    pub decks: Arc<dyn DeckDirectory>,
    pub auth: Arc<dyn Authenticator>,
}

impl Api {
    #[must_use]
    pub fn in_memory() -> (Self, InMemoryApi) {
        let fake = InMemoryApi::new();
        (Self::from_shared(fake.clone()), fake)
    }

    /// Wrap one value implementing every port.
    #[must_use]
    pub fn from_shared<T>(inner: T) -> Self
    where
        T: CardProvider + ReviewSink + DeckDirectory + Authenticator + 'static,
    {
        let inner = Arc::new(inner);
        Self {
            cards: inner.clone(),
            reviews: inner.clone(),
            decks: inner.clone(),
            auth: inner,
        }
    }
}
