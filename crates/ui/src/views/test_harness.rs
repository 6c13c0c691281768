use std::sync::{Arc, Mutex};

use deck_core::model::{CardId, UserId, UserRef};
use deck_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, Clock};
use storage::memory::InMemoryRepository;
use storage::seed::seed_demo;

use crate::context::{UiApp, build_app_context, use_card_scope_provider};
use crate::views::{CardScreen, HomeView};
use crate::vm::CardQuery;

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    /// The seeded demo card.
    DemoCard,
    Card(CardId),
}

/// Where the harness sends the view and what it records back.
#[derive(Clone)]
struct HarnessTarget {
    view: ViewKind,
    query: CardQuery,
    writes: Arc<Mutex<Vec<CardQuery>>>,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    target: HarnessTarget,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_card_scope_provider();
    use_context_provider(|| props.target.clone());
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
    let target = use_context::<HarnessTarget>();
    let initial = target.query.clone();
    let mut query = use_signal(move || initial);
    let writes = Arc::clone(&target.writes);
    // Stands in for the router: record the write, then feed it back.
    let on_query = use_callback(move |next: CardQuery| {
        if let Ok(mut log) = writes.lock() {
            log.push(next.clone());
        }
        query.set(next);
    });

    match target.view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Card(card_id) => rsx! {
            CardScreen { card_id, query: query(), on_query }
        },
        ViewKind::DemoCard => rsx! {},
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub card_id: CardId,
    writes: Arc<Mutex<Vec<CardQuery>>>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Run a few async rounds: enough for a load plus the effects it wakes.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn query_writes(&self) -> Vec<CardQuery> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn demo_owner() -> UserRef {
    UserRef::new(UserId::new("u-owner"), "Olive")
}

/// Seeded demo card served in-process. `signed_in` decides whether the
/// owner or nobody is the current user.
pub fn setup_view_harness(view: ViewKind, raw_query: &str, signed_in: bool) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let repo = InMemoryRepository::new().with_clock(clock);
    let owner = demo_owner();
    let card_id = seed_demo(&repo, &owner, fixed_now());
    let services = AppServices::in_memory(&repo, clock, signed_in.then(|| owner.clone()));

    let view = match view {
        ViewKind::DemoCard => ViewKind::Card(card_id.clone()),
        other => other,
    };
    let writes = Arc::new(Mutex::new(Vec::new()));
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(services),
            target: HarnessTarget {
                view,
                query: CardQuery::parse(raw_query),
                writes: Arc::clone(&writes),
            },
        },
    );

    ViewHarness {
        dom,
        repo,
        card_id,
        writes,
    }
}

