use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use study_core::model::{
    BatchCard, CardError, CardType, DeckId, FlashcardId, MalformedCard, NoteId, Rating, StudyCard,
};
use tracing::{debug, warn};

use super::HttpApi;
use crate::ports::{ApiError, CardProvider, ReviewReceipt, ReviewSink};

#[derive(Debug, Deserialize)]
struct SessionBody {
    /// Slots are decoded one by one so a bad card cannot sink the batch.
    cards: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct CardPayload {
    flashcard_id: Option<FlashcardId>,
    note_id: Option<NoteId>,
    front: Option<String>,
    back: Option<String>,
    card_type: Option<CardType>,
    due_date: Option<String>,
}

impl CardPayload {
    fn slot_from_value(value: Value) -> BatchCard {
        if value.is_null() {
            return BatchCard::Malformed(MalformedCard {
                flashcard_id: None,
                error: CardError::MissingId,
            });
        }
        let flashcard_id = value
            .get("flashcard_id")
            .and_then(|id| FlashcardId::deserialize(id).ok());
        match CardPayload::deserialize(value) {
            Ok(payload) => payload.into_slot(),
            Err(err) => {
                warn!(?flashcard_id, %err, "undecodable card in study batch");
                BatchCard::Malformed(MalformedCard {
                    flashcard_id,
                    error: CardError::InvalidField,
                })
            }
        }
    }

    fn into_slot(self) -> BatchCard {
        let due_date = self
            .due_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
        let flashcard_id = self.flashcard_id;
        let note_id = self.note_id;
        let card_type = self.card_type;
        StudyCard::from_parts(flashcard_id, self.front, self.back)
            .map(|card| {
                card.with_note_id(note_id)
                    .with_card_type(card_type)
                    .with_due_date(due_date)
            })
            .map_err(|error| {
                warn!(?flashcard_id, %error, "malformed card in study batch");
                MalformedCard {
                    flashcard_id,
                    error,
                }
            })
            .into()
    }
}

#[derive(Debug, Serialize)]
struct ReviewRequest {
    rating: Rating,
}

#[derive(Debug, Deserialize)]
struct ReviewBody {
    points_earned: Option<u32>,
    message: Option<String>,
}

#[async_trait]
impl CardProvider for HttpApi {
    async fn due_cards(&self, deck_id: DeckId) -> Result<Vec<BatchCard>, ApiError> {
        let body: SessionBody = self
            .get_envelope(&format!("api/study/session/{deck_id}"))
            .await?;
        let cards = body
            .cards
            .ok_or_else(|| ApiError::Decode("response has no cards".into()))?;
        debug!(%deck_id, count = cards.len(), "fetched study batch");

        Ok(cards.into_iter().map(CardPayload::slot_from_value).collect())
    }
}

#[async_trait]
impl ReviewSink for HttpApi {
    async fn submit_review(
        &self,
        flashcard_id: FlashcardId,
        rating: Rating,
    ) -> Result<ReviewReceipt, ApiError> {
        let body: ReviewBody = self
            .post_json_envelope(
                &format!("api/study/review/{flashcard_id}"),
                &ReviewRequest { rating },
            )
            .await?;
        debug!(%flashcard_id, %rating, "review recorded");
        Ok(ReviewReceipt {
            flashcard_id,
            points_earned: body.points_earned,
            message: body.message,
        })
    }
}
