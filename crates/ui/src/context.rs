use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use services::{AuthService, DeckService, StudyController};
use study_core::model::DeckId;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    /// Deck to open on launch, from `--deck-id` or the environment.
    fn initial_deck_id(&self) -> Option<DeckId>;

    fn study(&self) -> Arc<StudyController>;
    fn decks(&self) -> Arc<DeckService>;
    fn auth(&self) -> Arc<AuthService>;
}

#[derive(Clone)]
pub struct AppContext {
    initial_deck_id: Option<DeckId>,
    open_initial_deck_once: Arc<AtomicBool>,

    study: Arc<StudyController>,
    decks: Arc<DeckService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_deck_id = app.initial_deck_id();
        Self {
            initial_deck_id,
            open_initial_deck_once: Arc::new(AtomicBool::new(initial_deck_id.is_some())),
            study: app.study(),
            decks: app.decks(),
            auth: app.auth(),
        }
    }

    /// The launch deck, handed out once so returning to the deck list does
    /// not bounce straight back into it.
    #[must_use]
    pub fn take_initial_deck_id(&self) -> Option<DeckId> {
        if self.open_initial_deck_once.swap(false, Ordering::AcqRel) {
            self.initial_deck_id
        } else {
            None
        }
    }

    #[must_use]
    pub fn study(&self) -> Arc<StudyController> {
        Arc::clone(&self.study)
    }

    #[must_use]
    pub fn decks(&self) -> Arc<DeckService> {
        Arc::clone(&self.decks)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}
