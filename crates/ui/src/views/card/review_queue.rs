use chrono::{DateTime, Utc};
use deck_core::model::{CardId, QueueItemId, ReviewQueueItem};
use dioxus::prelude::*;
use services::DecisionKind;

use crate::context::AppContext;
use crate::hooks::{
    ReviewDecisionsHandle, Sentinel, use_review_decisions, use_review_queue_items,
    use_sentinel_row,
};
use crate::vm::{
    ChangeVm, PanelBody, QueueRowVm, ReviewItemDetailVm, ValuePanel, filter_queue_items,
};

use super::components::{Banner, BannerKind, DiffText, Highlighted};

fn row_dom_id(id: &QueueItemId) -> String {
    format!("queue-row-{id}")
}

/// Pending proposals for the card, filtered by the card search.
#[component]
pub fn ReviewQueuePane(card_id: CardId, search: String) -> Element {
    let ctx = use_context::<AppContext>();
    let open = use_signal(|| true);
    let list = use_review_queue_items(card_id.clone(), open);
    let mut selected = use_signal(|| None::<QueueItemId>);

    let on_decided = use_callback(move |item_id: QueueItemId| {
        let mut state = list.state;
        state.write().remove_where(|item| item.id == item_id);
        if selected.peek().as_ref() == Some(&item_id) {
            selected.set(None);
        }
    });
    let decisions = use_review_decisions(card_id, on_decided);
    let on_back = use_callback(move |()| selected.set(None));

    let state = list.state.read();
    let visible = filter_queue_items(state.items(), &search);
    let chosen = selected
        .read()
        .as_ref()
        .and_then(|id| state.items().iter().find(|item| &item.id == id).cloned());

    let banners = {
        let decisions_state = decisions.state.read();
        let error = decisions_state.error().map(str::to_string);
        let notice = decisions_state.notice().map(str::to_string);
        rsx! {
            if let Some(message) = error {
                Banner { kind: BannerKind::Error, message, on_dismiss: decisions.dismiss }
            }
            if let Some(message) = notice {
                Banner { kind: BannerKind::Info, message }
            }
        }
    };

    if let Some(item) = chosen {
        return rsx! {
            section { class: "pane review-pane",
                {banners}
                ReviewItemDetail { item, decisions, now: ctx.clock().now(), on_back }
            }
        };
    }

    let last_index = visible.len().checked_sub(1);
    let sentinel = list.sentinel;
    let empty_text = if search.is_empty() {
        "Nothing is waiting for review.".to_string()
    } else {
        format!("No pending changes match “{search}”.")
    };

    rsx! {
        section { class: "pane review-pane",
            {banners}
            if visible.is_empty() && !state.is_loading() && state.error().is_none() {
                p { class: "empty", "{empty_text}" }
            }
            ul { class: "queue-list",
                for (idx, item) in visible.iter().enumerate() {
                    QueueRow {
                        key: "{item.id}",
                        row: QueueRowVm::from_item(item),
                        search: search.clone(),
                        is_last: Some(idx) == last_index,
                        sentinel,
                        on_select: move |id: QueueItemId| selected.set(Some(id)),
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
                        onclick: move |_| list.retry.call(()),
                        "Retry"
                    }
                }
            }
        }
    }
}

#[component]
fn QueueRow(
    row: QueueRowVm,
    search: String,
    is_last: bool,
    sentinel: Sentinel,
    on_select: Callback<QueueItemId>,
) -> Element {
    let dom_id = row_dom_id(&row.id);
    let select_id = row.id.clone();
    use_sentinel_row(sentinel, dom_id.clone(), is_last);
    let kind = row.change_type.as_str();

    rsx! {
        li {
            id: "{dom_id}",
            class: "queue-row queue-row--{kind}",
            onclick: move |_| on_select.call(select_id.clone()),
            div { class: "queue-row-head",
                span { class: "badge badge--{kind}", "{kind}" }
                span { class: "queue-field", "{row.field_label}" }
                if row.grouped_count > 0 {
                    span { class: "muted", " · {row.grouped_count} changes" }
                }
            }
            p { class: "queue-summary",
                Highlighted { text: row.summary.clone(), query: search.clone() }
            }
            p { class: "queue-meta muted",
                Highlighted { text: row.submitter.clone(), query: search.clone() }
                " · {row.submitted_at}"
            }
        }
    }
}

/// Inspect one proposal before accepting or rejecting it.
#[component]
pub fn ReviewItemDetail(
    item: ReviewQueueItem,
    decisions: ReviewDecisionsHandle,
    now: DateTime<Utc>,
    on_back: Callback<()>,
) -> Element {
    let vm = ReviewItemDetailVm::from_item(&item, now);
    let state = decisions.state.read();
    let can_act = state.can_act();
    let accept_label = if state.is_busy(DecisionKind::Accept) {
        DecisionKind::Accept.busy_label()
    } else {
        DecisionKind::Accept.label()
    };
    let reject_label = if state.is_busy(DecisionKind::Reject) {
        DecisionKind::Reject.busy_label()
    } else {
        DecisionKind::Reject.label()
    };
    let accept_id = vm.id.clone();
    let reject_id = vm.id.clone();

    rsx! {
        article { class: "review-detail",
            button {
                class: "btn btn-ghost",
                r#type: "button",
                onclick: move |_| on_back.call(()),
                "‹ Back to queue"
            }
            h3 { "{vm.title}" }
            p { class: "muted",
                "Proposed by {vm.submitter} on {vm.submitted_at}"
                {match &vm.remaining {
                    Some(remaining) => rsx! { " · expires in {remaining}" },
                    None => rsx! { " · expired" },
                }}
            }
            for (idx, change) in vm.changes.iter().enumerate() {
                ChangeBlock { key: "{idx}", change: change.clone(), grouped: vm.grouped }
            }
            div { class: "decision-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_act,
                    onclick: move |_| decisions.accept(accept_id.clone()),
                    "{accept_label}"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    disabled: !can_act,
                    onclick: move |_| decisions.reject(reject_id.clone()),
                    "{reject_label}"
                }
            }
        }
    }
}

#[component]
fn ChangeBlock(change: ChangeVm, grouped: bool) -> Element {
    rsx! {
        div { class: "change-block",
            if grouped {
                h4 { class: "change-field", "{change.field_label} ({change.change_type.as_str()})" }
            }
            div { class: "change-panels",
                if let Some(panel) = change.old.clone() {
                    PanelView { panel, side: "old" }
                }
                if let Some(panel) = change.new.clone() {
                    PanelView { panel, side: "new" }
                }
            }
        }
    }
}

#[component]
fn PanelView(panel: ValuePanel, side: &'static str) -> Element {
    let body = match panel.body {
        PanelBody::Empty => rsx! {
            p { class: "muted", "(empty)" }
        },
        PanelBody::Text(text) => rsx! {
            p { "{text}" }
        },
        PanelBody::Html(html) => rsx! {
            div { class: "rich-text", dangerous_inner_html: "{html}" }
        },
        PanelBody::Diff(spans) => rsx! {
            DiffText { spans, changed_class: format!("diff-{side}") }
        },
        PanelBody::Flashcard { question, answer } => rsx! {
            dl {
                dt { "Question" }
                dd { dangerous_inner_html: "{question}" }
                dt { "Answer" }
                dd { dangerous_inner_html: "{answer}" }
            }
        },
        PanelBody::Quiz {
            question,
            answer,
            options,
        } => rsx! {
            dl {
                dt { "Question" }
                dd { dangerous_inner_html: "{question}" }
                dt { "Answer" }
                dd { dangerous_inner_html: "{answer}" }
                dt { "Options" }
                dd {
                    ul {
                        for (idx, option) in options.iter().enumerate() {
                            li { key: "{idx}", dangerous_inner_html: "{option}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "value-panel value-panel--{side}",
            span { class: "panel-label", "{panel.label}" }
            {body}
        }
    }
}
