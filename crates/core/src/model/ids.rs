use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a deck.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(u64);

impl DeckId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Server-assigned identifier of a single reviewable flashcard.
///
/// A flashcard is what gets rated; it is distinct from the note that holds the
/// front/back text, although the two correspond 1:1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardId(u64);

impl FlashcardId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Identifier of the note backing a flashcard.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckId({})", self.0)
    }
}

impl fmt::Debug for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlashcardId({})", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId({})", self.0)
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when an identifier cannot be parsed from text (route
/// parameters, CLI flags, environment variables).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

fn parse_u64(s: &str, kind: &'static str) -> Result<u64, ParseIdError> {
    s.trim().parse::<u64>().map_err(|_| ParseIdError {
        kind,
        raw: s.to_string(),
    })
}

impl FromStr for DeckId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s, "deck id").map(DeckId::new)
    }
}

impl FromStr for FlashcardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s, "flashcard id").map(FlashcardId::new)
    }
}

impl FromStr for NoteId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s, "note id").map(NoteId::new)
    }
}
