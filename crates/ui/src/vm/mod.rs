mod deck_vm;
mod study_vm;

pub use deck_vm::{DeckCardVm, DeckOptionVm, map_deck_cards, map_deck_options};
pub use study_vm::{DEFAULT_TITLE, StudyBody, StudyIntent, StudyVm};
