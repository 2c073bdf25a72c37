//! Shared error types for the services crate.

use api::ApiError;
use study_core::model::CardError;
use thiserror::Error;

/// Study actions that are not valid in the current session state.
///
/// These never reach the network; the UI treats them as no-ops.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no card is being presented")]
    NotPresenting,
    #[error("a review is already being submitted")]
    Busy,
    #[error("flip the card before rating it")]
    NotFlipped,
    #[error("current card cannot be displayed: {0}")]
    MalformedCard(CardError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email and password are required")]
    MissingFields,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
}
