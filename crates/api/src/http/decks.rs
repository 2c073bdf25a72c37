use async_trait::async_trait;
use serde::Deserialize;
use study_core::model::{DeckId, DeckSummary};
use tracing::warn;

use super::HttpApi;
use crate::ports::{ApiError, DeckDirectory};

#[derive(Debug, Deserialize)]
struct DecksBody {
    #[serde(default)]
    decks: Vec<DeckPayload>,
}

#[derive(Debug, Deserialize)]
struct DeckPayload {
    id: DeckId,
    name: String,
    description: Option<String>,
    card_count: Option<u32>,
    mastered_percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DeckBody {
    deck: Option<DeckNamePayload>,
}

#[derive(Debug, Deserialize)]
struct DeckNamePayload {
    name: Option<String>,
}

#[async_trait]
impl DeckDirectory for HttpApi {
    async fn list_decks(&self) -> Result<Vec<DeckSummary>, ApiError> {
        let body: DecksBody = self.get_envelope("api/decks").await?;
        let decks = body
            .decks
            .into_iter()
            .filter_map(|deck| match DeckSummary::new(deck.id, deck.name) {
                Ok(summary) => Some(
                    summary
                        .with_description(deck.description)
                        .with_card_count(deck.card_count)
                        .with_mastered_percentage(deck.mastered_percentage),
                ),
                Err(err) => {
                    warn!(deck_id = %deck.id, %err, "skipping deck");
                    None
                }
            })
            .collect();
        Ok(decks)
    }

    async fn deck_name(&self, deck_id: DeckId) -> Result<String, ApiError> {
        let body: DeckBody = self.get_envelope(&format!("api/decks/{deck_id}")).await?;
        body.deck
            .and_then(|deck| deck.name)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Decode("deck name missing".into()))
    }
}
