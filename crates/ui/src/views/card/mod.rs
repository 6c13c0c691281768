mod components;
mod flashcards;
mod log_modal;
mod quizzes;
mod review_queue;
mod topic;

use std::time::Duration;

use deck_core::model::CardId;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::CacheTag;

use crate::context::{AppContext, use_card_scope};
use crate::hooks::{
    CardPatcher, PatchStatus, use_card_patcher, use_debounce, use_edit_card_manager,
};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CardQuery, CardView};

use components::{Banner, BannerKind};
use flashcards::FlashcardsPane;
use log_modal::LogModal;
use quizzes::QuizzesPane;
use review_queue::ReviewQueuePane;
use topic::TopicHeader;

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Route target. Query changes are written back with `replace` so paging
/// through a card does not flood the history.
#[component]
pub fn CardPage(card_id: String, query: CardQuery) -> Element {
    let navigator = use_navigator();
    let route_card = card_id.clone();
    let on_query = use_callback(move |next: CardQuery| {
        navigator.replace(Route::Card {
            card_id: route_card.clone(),
            query: next,
        });
    });

    rsx! {
        CardScreen {
            key: "{card_id}",
            card_id: CardId::new(card_id.clone()),
            query,
            on_query,
        }
    }
}

#[component]
pub fn CardScreen(card_id: CardId, query: CardQuery, on_query: Callback<CardQuery>) -> Element {
    let ctx = use_context::<AppContext>();
    let scope = use_card_scope();
    let query = use_memo(use_reactive((&query,), |(query,)| query));

    let cards = ctx.card_service();
    let load_id = card_id.clone();
    let resource = use_resource(move || {
        let cards = cards.clone();
        let id = load_id.clone();
        // Re-run whenever an edit or decision marks the card stale.
        let _version = scope.version(&CacheTag::Card(id.clone()));
        let mut current = scope.current;
        async move {
            let card = cards
                .load_card(&id)
                .await
                .map_err(|err| ViewError::Message(err.user_message()))?;
            current.set(Some(card));
            Ok::<(), ViewError>(())
        }
    });
    let mut slot = scope.current;
    use_drop(move || slot.set(None));

    let manager = use_edit_card_manager(scope, query, on_query);
    let patcher = use_card_patcher(scope);
    let can_edit = ctx.current_user().is_some();

    let initial_search = query.peek().search_term().to_string();
    let mut search_input = use_signal(move || initial_search);
    let debounced = use_debounce(search_input, SEARCH_DEBOUNCE);
    use_effect(move || {
        let term = debounced();
        manager.set_search(&term);
    });

    let log_open = use_signal(|| false);

    let card = scope
        .current
        .read()
        .clone()
        .filter(|card| card.id == card_id);
    let Some(card) = card else {
        return match view_state_from_resource(&resource) {
            ViewState::Error(err) => rsx! {
                div { class: "page card-page",
                    p { class: "error", "{err.message()}" }
                }
            },
            _ => rsx! {
                div { class: "page card-page",
                    p { class: "muted", "Loading card…" }
                }
            },
        };
    };

    let active = *manager.view.read();
    let (flashcard_total, quiz_total) = manager.totals();
    let pending_reviews = card.pending_reviews;
    let tab_count = |view: CardView| match view {
        CardView::Flashcards => flashcard_total.to_string(),
        CardView::Quizzes => quiz_total.to_string(),
        CardView::ReviewQueue => pending_reviews.to_string(),
    };
    let mut open_log = log_open;

    rsx! {
        div { class: "page card-page",
            TopicHeader { topic: card.topic.clone(), patcher, can_edit }
            PatchBanner { patcher }
            div { class: "card-toolbar",
                nav { class: "view-tabs",
                    for view in CardView::ALL {
                        button {
                            key: "{view.as_str()}",
                            class: if view == active { "tab tab--active" } else { "tab" },
                            r#type: "button",
                            onclick: move |_| manager.set_view(view),
                            "{view.label()} "
                            span { class: "tab-count", "{tab_count(view)}" }
                        }
                    }
                }
                input {
                    class: "card-search",
                    r#type: "search",
                    placeholder: "Search this card",
                    value: "{search_input}",
                    oninput: move |evt| search_input.set(evt.value()),
                }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| open_log.set(true),
                    "Activity"
                }
            }
            {match active {
                CardView::Flashcards => rsx! {
                    FlashcardsPane { manager, patcher, can_edit }
                },
                CardView::Quizzes => rsx! {
                    QuizzesPane { manager, patcher, can_edit }
                },
                CardView::ReviewQueue => rsx! {
                    ReviewQueuePane { card_id: card_id.clone(), search: manager.search.read().clone() }
                },
            }}
            LogModal { card_id: card_id.clone(), open: log_open, patcher, can_revert: can_edit }
        }
    }
}

#[component]
fn PatchBanner(patcher: CardPatcher) -> Element {
    let status = patcher.status.read().clone();
    let dismiss = use_callback(move |()| patcher.dismiss());
    match status {
        PatchStatus::Idle => rsx! {},
        PatchStatus::Saving => rsx! {
            p { class: "patch-status muted", "Saving…" }
        },
        PatchStatus::Saved => rsx! {
            p { class: "patch-status patch-status--ok", "Saved" }
        },
        PatchStatus::Queued(message) => rsx! {
            Banner { kind: BannerKind::Info, message, on_dismiss: dismiss }
        },
        PatchStatus::Failed(message) => rsx! {
            Banner { kind: BannerKind::Error, message, on_dismiss: dismiss }
        },
    }
}
