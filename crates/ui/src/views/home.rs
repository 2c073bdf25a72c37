use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use super::{ViewError, ViewState, view_state_from_resource};
use crate::context::AppContext;
use crate::routes::{Route, login_route};
use crate::vm::map_deck_cards;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let deck_service = ctx.decks();

    // A deck given on the command line opens the study page straight away.
    use_effect(move || {
        if let Some(deck_id) = ctx.take_initial_deck_id() {
            navigator.replace(Route::study(Some(deck_id)));
        }
    });

    let mut resource = use_resource(move || {
        let deck_service = deck_service.clone();
        async move {
            let decks = deck_service.list_decks().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_deck_cards(&decks))
        }
    });

    let body = match view_state_from_resource(&resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "muted", "Loading decks..." }
        },
        ViewState::Ready(decks) if decks.is_empty() => rsx! {
            p { class: "muted", "No decks yet." }
        },
        ViewState::Ready(decks) => rsx! {
            ul { class: "deck-list",
                for deck in decks {
                    li { class: "deck-card", key: "{deck.id}",
                        h3 { "{deck.name}" }
                        if let Some(description) = deck.description.as_deref() {
                            p { class: "deck-card__description", "{description}" }
                        }
                        if !deck.meta.is_empty() {
                            p { class: "deck-card__meta", "{deck.meta}" }
                        }
                        Link { class: "btn btn-primary", to: Route::study(Some(deck.id)), "Study" }
                    }
                }
            }
        },
        ViewState::Error(err @ ViewError::SessionExpired) => {
            let message = err.message();
            rsx! {
                p { class: "notice", role: "alert", "{message}" }
                Link { class: "btn btn-primary", to: login_route("/"), "Sign in" }
            }
        }
        ViewState::Error(err) => {
            let message = err.message();
            rsx! {
                p { class: "notice", role: "alert", "{message}" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| resource.restart(),
                    "Retry"
                }
            }
        }
    };

    rsx! {
        div { class: "page home-page",
            h2 { "Your Decks" }
            {body}
        }
    }
}
