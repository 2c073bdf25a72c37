use dioxus::prelude::*;
use dioxus_router::use_navigator;
use study_core::model::{DeckId, Rating};

use crate::routes::Route;
use crate::vm::{DeckOptionVm, StudyBody, StudyIntent};

#[component]
pub(super) fn DeckSelector(
    options: Vec<DeckOptionVm>,
    selected: Option<DeckId>,
    on_intent: EventHandler<StudyIntent>,
    on_focus_change: EventHandler<bool>,
) -> Element {
    let value = selected.map(|id| id.to_string()).unwrap_or_default();
    rsx! {
        select {
            class: "deck-select",
            id: "deck-select",
            value: "{value}",
            // Keys typed into the selector must not reach the study shortcuts.
            onfocus: move |_| on_focus_change.call(true),
            onblur: move |_| on_focus_change.call(false),
            onkeydown: move |evt: KeyboardEvent| evt.stop_propagation(),
            onchange: move |evt: FormEvent| {
                let deck = evt.value().trim().parse::<DeckId>().ok();
                on_intent.call(StudyIntent::SelectDeck(deck));
            },
            option { value: "", "Select a deck..." }
            for deck in options {
                option {
                    key: "{deck.id}",
                    value: "{deck.id}",
                    selected: Some(deck.id) == selected,
                    "{deck.label}"
                }
            }
        }
    }
}

/// Card area. Front and back are rendered as text nodes only.
#[component]
pub(super) fn FlashcardPanel(
    body: StudyBody,
    is_flipped: bool,
    can_flip: bool,
    on_intent: EventHandler<StudyIntent>,
) -> Element {
    match body {
        StudyBody::Card { front, back } => rsx! {
            div {
                class: if is_flipped { "flashcard flashcard--flipped" } else { "flashcard" },
                id: "flashcard",
                onclick: move |_| {
                    if can_flip {
                        on_intent.call(StudyIntent::Flip);
                    }
                },
                div { class: "flashcard__front", id: "card-front",
                    p { "{front}" }
                }
                if is_flipped {
                    div { class: "flashcard__back", id: "card-back",
                        p { "{back}" }
                    }
                } else {
                    p { class: "flashcard__hint", "Click or press Space to flip" }
                }
            }
        },
        StudyBody::Message { headline, detail } => rsx! {
            div { class: "flashcard flashcard--message", id: "flashcard",
                div { class: "flashcard__front", id: "card-front",
                    p { "{headline}" }
                }
                if !detail.is_empty() {
                    div { class: "flashcard__back", id: "card-back",
                        p { "{detail}" }
                    }
                }
            }
        },
        StudyBody::Complete { .. } => rsx! {},
    }
}

#[component]
pub(super) fn RatingButtons(
    enabled: bool,
    submitting: bool,
    on_intent: EventHandler<StudyIntent>,
) -> Element {
    rsx! {
        div { class: "study-controls",
            for rating in Rating::ALL {
                RatingButton { key: "{rating}", rating, enabled, submitting, on_intent }
            }
        }
    }
}

#[component]
fn RatingButton(
    rating: Rating,
    enabled: bool,
    submitting: bool,
    on_intent: EventHandler<StudyIntent>,
) -> Element {
    let class = match rating {
        Rating::Hard => "btn rating rating--hard",
        Rating::Good => "btn rating rating--good",
        Rating::Easy => "btn rating rating--easy",
    };
    let label = if submitting { "..." } else { rating.label() };
    let shortcut = rating.shortcut();
    rsx! {
        button {
            class,
            id: "rate-{rating}",
            r#type: "button",
            disabled: !enabled,
            title: "Shortcut: {shortcut}",
            onclick: move |_| on_intent.call(StudyIntent::Rate(rating)),
            "{label}"
        }
    }
}

#[component]
pub(super) fn CompletionPanel(reviewed: usize) -> Element {
    let navigator = use_navigator();
    rsx! {
        div { class: "flashcard flashcard--message session-complete", id: "session-complete",
            h2 { "Session Complete!" }
            p { "You've reviewed all {reviewed} cards in this batch. Great job!" }
            p { "Select another deck above to continue studying." }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| {
                    navigator.push(Route::Home {});
                },
                "Back to Decks"
            }
        }
    }
}
