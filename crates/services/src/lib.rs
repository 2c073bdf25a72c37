#![forbid(unsafe_code)]

pub mod auth_service;
pub mod deck_service;
pub mod error;
pub mod study;

pub use study_core::Clock;

pub use auth_service::AuthService;
pub use deck_service::DeckService;
pub use error::{AuthError, SessionError};
pub use study::{
    LoadOutcome, LoadTicket, Phase, RatingTally, ReviewOutcome, ReviewTicket,
    SessionProgress, SessionSnapshot, SessionState, StudyController, StudySession,
};
