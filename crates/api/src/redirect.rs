//! Paths for the login entry point and its return target.

use study_core::model::DeckId;
use url::form_urlencoded;

/// Path of the study page, optionally preselecting a deck.
#[must_use]
pub fn study_path(deck_id: Option<DeckId>) -> String {
    match deck_id {
        Some(id) => format!("/study?deck_id={id}"),
        None => "/study".to_string(),
    }
}

/// Login entry point that returns to `next` after signing in.
#[must_use]
pub fn login_redirect(next: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("tab", "login")
        .append_pair("next", next)
        .finish();
    format!("/auth?{query}")
}

/// The decoded `next` value of a login page query string, if any.
#[must_use]
pub fn login_next(query: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "next")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Accepts only same-origin relative paths as a return target.
#[must_use]
pub fn sanitize_next(next: &str) -> Option<&str> {
    let next = next.trim();
    let relative = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    relative.then_some(next)
}
