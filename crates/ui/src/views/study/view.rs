use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{LoadOutcome, ReviewOutcome};
use study_core::model::DeckId;
use tracing::debug;

use super::components::{CompletionPanel, DeckSelector, FlashcardPanel, RatingButtons};
use super::keys::shortcut_intent;
use crate::context::AppContext;
use crate::routes::{Route, login_route};
use crate::views::ViewError;
use crate::vm::{StudyBody, StudyIntent, StudyVm, map_deck_options};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn StudyView(deck_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let controller = ctx.study();
    let deck_service = ctx.decks();
    let selected_deck = deck_id.trim().parse::<DeckId>().ok();

    let mut snapshot = use_signal({
        let controller = controller.clone();
        move || controller.snapshot()
    });
    let vm = use_memo(move || StudyVm::from_snapshot(&snapshot.read()));

    let deck_options = use_resource(move || {
        let deck_service = deck_service.clone();
        async move {
            let decks = deck_service.list_decks().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_deck_options(&decks))
        }
    });

    // Runs again whenever the `deck_id` query parameter changes.
    let mut loader = {
        let controller = controller.clone();
        use_resource(use_reactive((&selected_deck,), move |(deck,)| {
            let controller = controller.clone();
            async move {
                let ticket = controller.begin_select(deck);
                snapshot.set(controller.snapshot());
                let Some(ticket) = ticket else {
                    return;
                };
                let outcome = controller.load(ticket).await;
                snapshot.set(controller.snapshot());
                if let LoadOutcome::AuthRequired { return_to } = outcome {
                    navigator.push(login_route(&return_to));
                }
            }
        }))
    };

    let dispatch_intent = {
        let controller = controller.clone();
        use_callback(move |intent: StudyIntent| {
            let controller = controller.clone();
            match intent {
                StudyIntent::Flip => {
                    if let Err(err) = controller.toggle_flip() {
                        debug!(%err, "flip ignored");
                    }
                    snapshot.set(controller.snapshot());
                }
                StudyIntent::Rate(rating) => {
                    let ticket = match controller.begin_review(rating) {
                        Ok(ticket) => ticket,
                        Err(err) => {
                            debug!(%err, %rating, "rating ignored");
                            return;
                        }
                    };
                    snapshot.set(controller.snapshot());
                    spawn(async move {
                        let outcome = controller.send_review(ticket).await;
                        snapshot.set(controller.snapshot());
                        if let ReviewOutcome::AuthRequired { return_to } = outcome {
                            navigator.push(login_route(&return_to));
                        }
                    });
                }
                StudyIntent::SelectDeck(deck) => {
                    if deck.is_some() && deck == controller.snapshot().deck_id {
                        loader.restart();
                    } else {
                        navigator.push(Route::study(deck));
                    }
                }
                StudyIntent::Retry => loader.restart(),
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<StudyTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    let mut selector_focused = use_signal(|| false);
    let on_key = use_callback(move |evt: KeyboardEvent| {
        let intent = shortcut_intent(
            &vm.read(),
            &evt.data.key(),
            evt.data.code(),
            evt.data.modifiers(),
            selector_focused(),
        );
        if let Some(intent) = intent {
            evt.prevent_default();
            dispatch_intent.call(intent);
        }
    });

    let vm = vm.read();
    let options = deck_options
        .value()
        .read()
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .cloned()
        .unwrap_or_default();

    rsx! {
        div { class: "page study-page", id: "study-root", tabindex: "0", onkeydown: on_key,
            header { class: "study-header",
                h2 { id: "deck-title", "{vm.title}" }
                DeckSelector {
                    options,
                    selected: vm.selector_deck,
                    on_intent: dispatch_intent,
                    on_focus_change: move |focused| selector_focused.set(focused),
                }
            }
            p { class: "study-counter", id: "card-counter", "{vm.counter}" }
            if let Some(percent) = vm.progress_percent {
                div { class: "progress",
                    div { class: "progress__bar", style: "width: {percent}%" }
                }
            }

            match &vm.body {
                StudyBody::Complete { reviewed } => rsx! {
                    CompletionPanel { reviewed: *reviewed }
                },
                body => rsx! {
                    FlashcardPanel {
                        body: body.clone(),
                        is_flipped: vm.is_flipped,
                        can_flip: vm.can_flip,
                        on_intent: dispatch_intent,
                    }
                },
            }

            if vm.controls_visible {
                RatingButtons {
                    enabled: vm.ratings_enabled,
                    submitting: vm.submitting,
                    on_intent: dispatch_intent,
                }
            }
            if let Some(notice) = vm.notice.as_deref() {
                p { class: "notice", role: "alert", "{notice}" }
            }
            if let Some(message) = vm.review_message.as_deref() {
                p { class: "review-message", "{message}" }
            }
            if vm.can_retry_load {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::Retry),
                    "Retry"
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct StudyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<StudyIntent>>>>,
}

#[cfg(test)]
impl StudyTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<StudyIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<StudyIntent> {
        (*self.dispatch.borrow()).expect("study dispatch registered")
    }
}
