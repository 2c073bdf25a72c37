mod controller;
mod progress;
mod state;

pub use controller::StudyController;
pub use progress::SessionProgress;
pub use state::{
    LoadOutcome, LoadTicket, Phase, RatingTally, ReviewOutcome, ReviewTicket, SessionSnapshot,
    SessionState, StudySession,
};
