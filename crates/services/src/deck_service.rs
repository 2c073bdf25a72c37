use std::sync::Arc;

use api::{ApiError, DeckDirectory};
use study_core::model::DeckSummary;
use tracing::warn;

/// Deck listing for the selector and the home page.
#[derive(Clone)]
pub struct DeckService {
    decks: Arc<dyn DeckDirectory>,
}

impl DeckService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckDirectory>) -> Self {
        Self { decks }
    }

    /// List the user's decks in server order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list_decks(&self) -> Result<Vec<DeckSummary>, ApiError> {
        self.decks.list_decks().await.inspect_err(|err| {
            warn!(%err, "deck list unavailable");
        })
    }
}
