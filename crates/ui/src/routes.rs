use dioxus::prelude::*;
use api::login_redirect;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HomeView, LoginView, StudyView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/study?:deck_id", StudyView)] Study { deck_id: String },
        #[route("/auth?:..query", LoginView)] Auth { query: String },
}

impl Route {
    /// Study page for `deck_id`, or the bare page with no deck selected.
    #[must_use]
    pub fn study(deck_id: Option<study_core::model::DeckId>) -> Self {
        Route::Study {
            deck_id: deck_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

/// Resolve an in-app path such as `/study?deck_id=3`. Anything the router
/// does not know lands on the deck list.
#[must_use]
pub fn route_for_path(path: &str) -> Route {
    path.parse::<Route>().unwrap_or(Route::Home {})
}

/// Login page that sends the user back to `return_to` afterwards.
#[must_use]
pub fn login_route(return_to: &str) -> Route {
    route_for_path(&login_redirect(return_to))
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "NeuroFlash" }
            ul {
                li { Link { to: Route::Home {}, "Decks" } }
                li { Link { to: Route::study(None), "Study" } }
                li { Link { to: Route::Auth { query: "tab=login".into() }, "Sign in" } }
            }
        }
    }
}
