use deck_core::model::{CardPatch, TopicField, TopicMeta};
use dioxus::prelude::*;

use crate::hooks::CardPatcher;
use crate::vm::field_label;

#[component]
pub fn TopicHeader(topic: TopicMeta, patcher: CardPatcher, can_edit: bool) -> Element {
    rsx! {
        header { class: "topic-header",
            for field in TopicField::ALL {
                TopicFieldRow {
                    key: "{field.wire_name()}",
                    field,
                    value: topic.get(field).to_string(),
                    patcher,
                    can_edit,
                }
            }
        }
    }
}

#[component]
fn TopicFieldRow(field: TopicField, value: String, patcher: CardPatcher, can_edit: bool) -> Element {
    let mut editing = use_signal(|| false);
    let mut draft = use_signal(String::new);
    let label = field_label(field.wire_name());

    let start_value = value.clone();
    let start = move |_: MouseEvent| {
        draft.set(start_value.clone());
        editing.set(true);
    };
    let original = value.clone();
    let save = move |evt: FormEvent| {
        evt.prevent_default();
        let next = draft.read().trim().to_string();
        editing.set(false);
        if next != original {
            patcher.patch(CardPatch::Topic { field, value: next });
        }
    };

    if editing() {
        return rsx! {
            form { class: "topic-field topic-field--editing", onsubmit: save,
                label { class: "topic-label", "{label}" }
                input {
                    r#type: "text",
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
                button { class: "btn", r#type: "submit", "Save" }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| editing.set(false),
                    "Cancel"
                }
            }
        };
    }

    rsx! {
        div { class: "topic-field",
            span { class: "topic-label", "{label}" }
            span { class: "topic-value",
                if value.trim().is_empty() { "—" } else { "{value}" }
            }
            if can_edit {
                button { class: "btn btn-ghost topic-edit", r#type: "button", onclick: start, "Edit" }
            }
        }
    }
}
