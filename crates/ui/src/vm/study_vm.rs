use services::{Phase, SessionSnapshot};
use study_core::model::{BatchCard, DeckId, Rating};

use crate::views::ViewError;

pub const DEFAULT_TITLE: &str = "NeuroFlash Study";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyIntent {
    Flip,
    Rate(Rating),
    SelectDeck(Option<DeckId>),
    /// Reload the current deck after a failed fetch.
    Retry,
}

/// What the card area shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudyBody {
    Message { headline: String, detail: String },
    Card { front: String, back: String },
    Complete { reviewed: usize },
}

impl StudyBody {
    fn message(headline: impl Into<String>, detail: impl Into<String>) -> Self {
        StudyBody::Message {
            headline: headline.into(),
            detail: detail.into(),
        }
    }
}

/// Everything the study page renders, derived from a `SessionSnapshot`.
#[derive(Clone, Debug, PartialEq)]
pub struct StudyVm {
    pub deck_id: Option<DeckId>,
    /// Deck shown in the selector. Cleared once a batch is finished so that
    /// picking the same deck again starts a new session.
    pub selector_deck: Option<DeckId>,
    pub title: String,
    pub counter: String,
    /// Width of the progress bar in percent, `None` hides it.
    pub progress_percent: Option<u8>,
    pub body: StudyBody,
    pub is_flipped: bool,
    pub controls_visible: bool,
    pub can_flip: bool,
    pub ratings_enabled: bool,
    pub submitting: bool,
    /// Inline error for a review that was not recorded.
    pub notice: Option<String>,
    /// Server acknowledgement of the last recorded review.
    pub review_message: Option<String>,
    pub can_retry_load: bool,
}

impl StudyVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let title = snapshot
            .deck_title
            .clone()
            .unwrap_or_else(|| match snapshot.phase {
                Phase::Idle => DEFAULT_TITLE.to_string(),
                _ => "Loading Deck...".to_string(),
            });
        let progress_percent = snapshot.progress.map(percent);

        let mut vm = Self {
            deck_id: snapshot.deck_id,
            selector_deck: snapshot.deck_id,
            title,
            counter: String::new(),
            progress_percent,
            body: StudyBody::message("", ""),
            is_flipped: false,
            controls_visible: false,
            can_flip: false,
            ratings_enabled: false,
            submitting: false,
            notice: snapshot
                .notice
                .as_ref()
                .map(|err| format!("Error submitting review: {}", ViewError::from(err).message())),
            review_message: None,
            can_retry_load: false,
        };

        match &snapshot.phase {
            Phase::Idle => {
                vm.body = StudyBody::message(
                    "Select a deck to begin.",
                    "Choose a deck from the dropdown above.",
                );
            }
            Phase::Loading => {
                vm.counter = "Loading...".into();
                vm.body = StudyBody::message("Loading cards...", "");
            }
            Phase::NothingDue => {
                vm.counter = "0 cards".into();
                vm.body = StudyBody::message(
                    "No cards due for study in this deck right now!",
                    "Check back later or add more cards.",
                );
            }
            Phase::Failed(err) => {
                vm.body = StudyBody::message(
                    format!("Error loading cards: {}", ViewError::from(err).message()),
                    "",
                );
                vm.can_retry_load = true;
            }
            Phase::AuthRequired { .. } => {
                vm.body = StudyBody::message(ViewError::SessionExpired.message(), "");
            }
            Phase::Complete => {
                vm.review_message.clone_from(&snapshot.last_message);
                vm.counter = format!("Completed {} cards!", snapshot.total);
                vm.selector_deck = None;
                vm.body = StudyBody::Complete {
                    reviewed: snapshot.total,
                };
            }
            Phase::Presenting | Phase::Submitting => {
                let submitting = snapshot.phase == Phase::Submitting;
                match &snapshot.current {
                    Some(BatchCard::Ready(card)) => {
                        vm.counter = format!("Card {} of {}", snapshot.cursor + 1, snapshot.total);
                        vm.body = StudyBody::Card {
                            front: card.front().to_string(),
                            back: card.back().to_string(),
                        };
                        vm.is_flipped = snapshot.is_flipped;
                        vm.review_message.clone_from(&snapshot.last_message);
                        vm.controls_visible = true;
                        vm.submitting = submitting;
                        vm.can_flip = !submitting;
                        vm.ratings_enabled = snapshot.is_flipped && !submitting;
                    }
                    Some(BatchCard::Malformed(_)) | None => {
                        vm.counter = "Error".into();
                        vm.body = StudyBody::message("Error loading card content.", "");
                    }
                }
            }
        }
        vm
    }

    /// Map a pressed key to an intent. `key` is the produced character, with
    /// `" "` for the space bar.
    #[must_use]
    pub fn intent_for_key(&self, key: &str) -> Option<StudyIntent> {
        if key == " " {
            return self.can_flip.then_some(StudyIntent::Flip);
        }
        let rating = Rating::from_shortcut(key)?;
        self.ratings_enabled.then_some(StudyIntent::Rate(rating))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::ApiError;
    use services::RatingTally;
    use study_core::model::{CardError, FlashcardId, MalformedCard, StudyCard};

    fn snapshot(phase: Phase) -> SessionSnapshot {
        SessionSnapshot {
            generation: 1,
            phase,
            deck_id: Some(DeckId::new(1)),
            deck_title: Some("Spanish".into()),
            current: None,
            cursor: 0,
            total: 0,
            is_flipped: false,
            progress: None,
            notice: None,
            last_message: None,
            tally: RatingTally::default(),
        }
    }

    fn presenting(cursor: usize, total: usize, flipped: bool) -> SessionSnapshot {
        SessionSnapshot {
            current: Some(BatchCard::from(StudyCard::new(
                FlashcardId::new(5),
                "hola",
                "hello",
            ))),
            cursor,
            total,
            is_flipped: flipped,
            progress: Some((cursor + 1) as f64 / total as f64),
            ..snapshot(Phase::Presenting)
        }
    }

    #[test]
    fn idle_prompts_for_a_deck() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            deck_id: None,
            deck_title: None,
            ..snapshot(Phase::Idle)
        });
        assert_eq!(vm.title, DEFAULT_TITLE);
        assert_eq!(
            vm.body,
            StudyBody::message("Select a deck to begin.", "Choose a deck from the dropdown above.")
        );
        assert!(!vm.controls_visible);
        assert_eq!(vm.progress_percent, None);
    }

    #[test]
    fn loading_without_title_says_so() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            deck_title: None,
            ..snapshot(Phase::Loading)
        });
        assert_eq!(vm.title, "Loading Deck...");
        assert_eq!(vm.counter, "Loading...");
    }

    #[test]
    fn presenting_shows_counter_and_disables_ratings_until_flip() {
        let vm = StudyVm::from_snapshot(&presenting(1, 4, false));
        assert_eq!(vm.counter, "Card 2 of 4");
        assert_eq!(vm.progress_percent, Some(50));
        assert!(vm.controls_visible);
        assert!(vm.can_flip);
        assert!(!vm.ratings_enabled);

        let flipped = StudyVm::from_snapshot(&presenting(1, 4, true));
        assert!(flipped.ratings_enabled);
        assert!(flipped.is_flipped);
    }

    #[test]
    fn submitting_disables_everything() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            phase: Phase::Submitting,
            ..presenting(0, 2, true)
        });
        assert!(vm.submitting);
        assert!(!vm.can_flip);
        assert!(!vm.ratings_enabled);
        assert_eq!(vm.intent_for_key("2"), None);
    }

    #[test]
    fn nothing_due_hides_controls() {
        let vm = StudyVm::from_snapshot(&snapshot(Phase::NothingDue));
        assert!(!vm.controls_visible);
        assert_eq!(vm.counter, "0 cards");
    }

    #[test]
    fn failed_load_offers_retry() {
        let vm = StudyVm::from_snapshot(&snapshot(Phase::Failed(ApiError::Rejected {
            status: 500,
            message: "db down".into(),
        })));
        assert!(vm.can_retry_load);
        assert_eq!(
            vm.body,
            StudyBody::message("Error loading cards: db down", "")
        );
    }

    #[test]
    fn malformed_card_shows_error_without_controls() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            current: Some(BatchCard::Malformed(MalformedCard {
                flashcard_id: None,
                error: CardError::MissingBack,
            })),
            total: 1,
            progress: Some(1.0),
            ..snapshot(Phase::Presenting)
        });
        assert_eq!(vm.counter, "Error");
        assert!(!vm.controls_visible);
        assert_eq!(vm.intent_for_key(" "), None);
    }

    #[test]
    fn completion_reports_count() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            cursor: 3,
            total: 3,
            progress: Some(1.0),
            ..snapshot(Phase::Complete)
        });
        assert_eq!(vm.counter, "Completed 3 cards!");
        assert_eq!(vm.body, StudyBody::Complete { reviewed: 3 });
        assert_eq!(vm.progress_percent, Some(100));
        assert!(!vm.controls_visible);
        assert_eq!(vm.deck_id, Some(DeckId::new(1)));
        assert_eq!(vm.selector_deck, None);
    }

    #[test]
    fn selector_follows_the_deck_while_studying() {
        let vm = StudyVm::from_snapshot(&presenting(0, 2, false));
        assert_eq!(vm.selector_deck, Some(DeckId::new(1)));
    }

    #[test]
    fn review_failure_is_shown_inline() {
        let vm = StudyVm::from_snapshot(&SessionSnapshot {
            notice: Some(ApiError::Transport("reset".into())),
            ..presenting(0, 2, true)
        });
        assert_eq!(
            vm.notice.as_deref(),
            Some("Error submitting review: Could not reach the server. Check your connection.")
        );
        assert!(vm.ratings_enabled);
    }

    #[test]
    fn keys_map_to_intents_only_when_allowed() {
        let unflipped = StudyVm::from_snapshot(&presenting(0, 2, false));
        assert_eq!(unflipped.intent_for_key(" "), Some(StudyIntent::Flip));
        assert_eq!(unflipped.intent_for_key("1"), None);

        let flipped = StudyVm::from_snapshot(&presenting(0, 2, true));
        assert_eq!(flipped.intent_for_key("1"), Some(StudyIntent::Rate(Rating::Hard)));
        assert_eq!(flipped.intent_for_key("g"), Some(StudyIntent::Rate(Rating::Good)));
        assert_eq!(flipped.intent_for_key("E"), Some(StudyIntent::Rate(Rating::Easy)));
        assert_eq!(flipped.intent_for_key("x"), None);
    }
}
