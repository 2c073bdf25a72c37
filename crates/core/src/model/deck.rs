use thiserror::Error;

use crate::model::ids::DeckId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,
}

/// A deck as listed by the server, used for the deck selector and the deck list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSummary {
    id: DeckId,
    name: String,
    description: Option<String>,
    card_count: Option<u32>,
    mastered_percentage: Option<f64>,
}

impl DeckSummary {
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if the trimmed name is empty.
    pub fn new(id: DeckId, name: impl Into<String>) -> Result<Self, DeckError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DeckError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            description: None,
            card_count: None,
            mastered_percentage: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    #[must_use]
    pub fn with_card_count(mut self, card_count: Option<u32>) -> Self {
        self.card_count = card_count;
        self
    }

    /// Percentages outside `0..=100` are clamped.
    #[must_use]
    pub fn with_mastered_percentage(mut self, pct: Option<f64>) -> Self {
        self.mastered_percentage = pct.filter(|p| p.is_finite()).map(|p| p.clamp(0.0, 100.0));
        self
    }

    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn card_count(&self) -> Option<u32> {
        self.card_count
    }

    #[must_use]
    pub fn mastered_percentage(&self) -> Option<f64> {
        self.mastered_percentage
    }
}
