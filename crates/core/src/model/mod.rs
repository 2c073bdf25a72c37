mod card;
mod deck;
mod ids;
mod rating;

pub use ids::{DeckId, FlashcardId, NoteId, ParseIdError};

pub use card::{BatchCard, CardError, CardType, MalformedCard, StudyCard};
pub use deck::{DeckError, DeckSummary};
pub use rating::{Rating, RatingError};
