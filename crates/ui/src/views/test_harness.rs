use std::sync::Arc;

use api::{Api, InMemoryApi};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AuthService, Clock, DeckService, StudyController};
use study_core::model::DeckId;
use study_core::time::fixed_now;

use crate::context::{AppContext, UiApp};
use crate::views::study::StudyTestHandles;
use crate::views::{HomeView, LoginView, StudyView};
use crate::vm::StudyIntent;

struct TestApp {
    initial_deck_id: Option<DeckId>,
    study: Arc<StudyController>,
    decks: Arc<DeckService>,
    auth: Arc<AuthService>,
}

impl TestApp {
    fn new(fake: &InMemoryApi) -> Self {
        let api = Api::from_shared(fake.clone());
        Self {
            initial_deck_id: None,
            study: Arc::new(StudyController::new(Clock::fixed(fixed_now()), &api)),
            decks: Arc::new(DeckService::new(Arc::clone(&api.decks))),
            auth: Arc::new(AuthService::new(Arc::clone(&api.auth))),
        }
    }
}

impl UiApp for TestApp {
    fn initial_deck_id(&self) -> Option<DeckId> {
        self.initial_deck_id
    }

    fn study(&self) -> Arc<StudyController> {
        Arc::clone(&self.study)
    }

    fn decks(&self) -> Arc<DeckService> {
        Arc::clone(&self.decks)
    }

    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Study(Option<u64>),
    Login(&'static str),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    study_handles: StudyTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| AppContext::new(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.study_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Study(deck_id) => {
            let deck_id = deck_id.map(|id| id.to_string()).unwrap_or_default();
            rsx! { StudyView { deck_id } }
        }
        ViewKind::Login(query) => rsx! { LoginView { query: query.to_string() } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub study_handles: StudyTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned futures and resources settle; several passes cover a
    /// fetch that itself triggers another fetch.
    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Send an intent to the mounted study page, as a click or key would.
    pub fn dispatch(&mut self, intent: StudyIntent) {
        let dispatch = self.study_handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, fake: &InMemoryApi) -> ViewHarness {
    let study_handles = StudyTestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp::new(fake)),
            view,
            study_handles: study_handles.clone(),
        },
    );
    ViewHarness { dom, study_handles }
}
