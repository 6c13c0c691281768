use std::time::Duration;

use deck_core::model::{CardId, Change};
use dioxus::prelude::*;

use crate::hooks::{CardPatcher, Sentinel, use_card_logs, use_debounce, use_sentinel_row};
use crate::vm::{LogEntryVm, map_log_entry};

use super::components::Highlighted;

const LOG_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Activity log overlay. Stays mounted so its paging state survives
/// re-renders of the card; only the overlay markup depends on `open`.
#[component]
pub fn LogModal(card_id: CardId, open: Signal<bool>, patcher: CardPatcher, can_revert: bool) -> Element {
    let mut search_input = use_signal(String::new);
    let debounced = use_debounce(search_input, LOG_SEARCH_DEBOUNCE);
    let logs = use_card_logs(card_id, open, debounced);

    if !open() {
        return rsx! {};
    }

    let mut open = open;
    let close = move |_: MouseEvent| {
        logs.sentinel.detach();
        search_input.set(String::new());
        open.set(false);
    };

    let state = logs.state.read();
    let entries: Vec<LogEntryVm> = state.items().iter().map(map_log_entry).collect();
    let last_index = entries.len().checked_sub(1);
    let term = search_input.read().trim().to_string();
    let sentinel = logs.sentinel;

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal log-modal", role: "dialog", aria_label: "Activity log",
                header { class: "modal-head",
                    h3 { "Activity" }
                    button { class: "btn btn-ghost", r#type: "button", onclick: close, "Close" }
                }
                input {
                    class: "log-search",
                    r#type: "search",
                    placeholder: "Search activity",
                    value: "{search_input}",
                    oninput: move |evt| search_input.set(evt.value()),
                }
                if entries.is_empty() && !state.is_loading() && state.error().is_none() {
                    p { class: "empty",
                        if term.is_empty() { "No activity yet." } else { "No activity matches “{term}”." }
                    }
                }
                ol { class: "log-list",
                    for (idx, entry) in entries.into_iter().enumerate() {
                        LogRow {
                            key: "{entry.id}",
                            entry,
                            search: term.clone(),
                            is_last: Some(idx) == last_index,
                            sentinel,
                            patcher,
                            can_revert,
                        }
                    }
                }
                if state.is_loading() {
                    p { class: "muted", "Loading…" }
                }
                if let Some(err) = state.error() {
                    div { class: "inline-error",
                        span { "{err}" }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| logs.retry.call(()),
                            "Retry"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LogRow(
    entry: LogEntryVm,
    search: String,
    is_last: bool,
    sentinel: Sentinel,
    patcher: CardPatcher,
    can_revert: bool,
) -> Element {
    let dom_id = format!("log-entry-{}", entry.id);
    use_sentinel_row(sentinel, dom_id.clone(), is_last);

    rsx! {
        li {
            id: "{dom_id}",
            class: "log-entry",
            p { class: "log-summary",
                Highlighted { text: entry.summary.clone(), query: search.clone() }
            }
            p { class: "log-meta muted",
                Highlighted { text: entry.actor.clone(), query: search.clone() }
                " · {entry.at}"
            }
            if !entry.changes.is_empty() {
                ul { class: "log-changes",
                    for (idx, change) in entry.changes.iter().enumerate() {
                        li { key: "{idx}", class: "log-change",
                            span { class: "log-field", "{change.field_label}: " }
                            span { class: "diff-old", "{change.old}" }
                            " → "
                            span { class: "diff-new", "{change.new}" }
                            if can_revert && change.revertible {
                                RevertButton { change: change.change.clone(), patcher }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RevertButton(change: Change, patcher: CardPatcher) -> Element {
    rsx! {
        button {
            class: "btn btn-ghost log-revert",
            r#type: "button",
            onclick: move |_| patcher.revert(change.clone()),
            "Revert"
        }
    }
}
