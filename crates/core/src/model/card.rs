use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{FlashcardId, NoteId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a card received from the server cannot be presented.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card is missing its flashcard id")]
    MissingId,

    #[error("card is missing its front text")]
    MissingFront,

    #[error("card is missing its back text")]
    MissingBack,

    #[error("card has a field of the wrong type")]
    InvalidField,
}

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// Scheduling bucket reported by the server. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    New,
    Learning,
    Review,
    #[serde(other)]
    Unknown,
}

/// A due card as handed to a study session.
///
/// `front` and `back` are untrusted text. They are only ever rendered as text
/// nodes, never interpreted as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyCard {
    flashcard_id: FlashcardId,
    note_id: Option<NoteId>,
    front: String,
    back: String,
    card_type: Option<CardType>,
    due_date: Option<NaiveDate>,
}

impl StudyCard {
    #[must_use]
    pub fn new(flashcard_id: FlashcardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            flashcard_id,
            note_id: None,
            front: front.into(),
            back: back.into(),
            card_type: None,
            due_date: None,
        }
    }

    /// Build a card from possibly-incomplete server fields.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field as a `CardError`.
    pub fn from_parts(
        flashcard_id: Option<FlashcardId>,
        front: Option<String>,
        back: Option<String>,
    ) -> Result<Self, CardError> {
        let flashcard_id = flashcard_id.ok_or(CardError::MissingId)?;
        let front = front.ok_or(CardError::MissingFront)?;
        let back = back.ok_or(CardError::MissingBack)?;
        Ok(Self::new(flashcard_id, front, back))
    }

    #[must_use]
    pub fn with_note_id(mut self, note_id: Option<NoteId>) -> Self {
        self.note_id = note_id;
        self
    }

    #[must_use]
    pub fn with_card_type(mut self, card_type: Option<CardType>) -> Self {
        self.card_type = card_type;
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    #[must_use]
    pub fn flashcard_id(&self) -> FlashcardId {
        self.flashcard_id
    }

    #[must_use]
    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    #[must_use]
    pub fn card_type(&self) -> Option<CardType> {
        self.card_type
    }

    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

//
// ─── BATCH SLOTS ───────────────────────────────────────────────────────────────
//

/// A card payload that failed validation.
///
/// It keeps its place in the batch so positions still match what the server
/// sent; the id is kept when present for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedCard {
    pub flashcard_id: Option<FlashcardId>,
    pub error: CardError,
}

/// One position in a fetched batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCard {
    Ready(StudyCard),
    Malformed(MalformedCard),
}

impl BatchCard {
    #[must_use]
    pub fn card(&self) -> Option<&StudyCard> {
        match self {
            BatchCard::Ready(card) => Some(card),
            BatchCard::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn flashcard_id(&self) -> Option<FlashcardId> {
        match self {
            BatchCard::Ready(card) => Some(card.flashcard_id()),
            BatchCard::Malformed(bad) => bad.flashcard_id,
        }
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, BatchCard::Malformed(_))
    }
}

impl From<StudyCard> for BatchCard {
    fn from(card: StudyCard) -> Self {
        BatchCard::Ready(card)
    }
}

impl From<Result<StudyCard, MalformedCard>> for BatchCard {
    fn from(value: Result<StudyCard, MalformedCard>) -> Self {
        match value {
            Ok(card) => BatchCard::Ready(card),
            Err(bad) => BatchCard::Malformed(bad),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
