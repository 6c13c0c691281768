use deck_core::model::{CardPatch, Flashcard};
use dioxus::prelude::*;

use crate::hooks::{CardPatcher, EditCardManager};

use super::components::{Pager, RichText};

#[component]
pub fn FlashcardsPane(manager: EditCardManager, patcher: CardPatcher, can_edit: bool) -> Element {
    let len = manager.len();
    let search = manager.search.read().clone();
    let (total, _) = manager.totals();

    let on_previous = use_callback(move |()| manager.previous());
    let on_next = use_callback(move |()| manager.next());
    let on_jump = use_callback(move |position: usize| manager.jump(position));

    let body = match manager.current_flashcard() {
        Some(flashcard) => rsx! {
            Pager {
                position: manager.index() + 1,
                len,
                original: manager.flashcard_original_position(),
                total,
                noun: "Flashcard",
                on_previous,
                on_next,
                on_jump,
            }
            FlashcardBody {
                key: "{flashcard.id}",
                flashcard: flashcard.clone(),
                direction_class: manager.direction().class(),
                patcher,
                can_edit,
            }
        },
        None if !search.is_empty() => rsx! {
            p { class: "empty", "No flashcards match “{search}”." }
        },
        None => rsx! {
            p { class: "empty", "This card has no flashcards yet." }
        },
    };

    rsx! {
        section { class: "pane flashcards-pane",
            {body}
            if can_edit {
                AddFlashcardForm { patcher }
            }
        }
    }
}

#[component]
fn FlashcardBody(
    flashcard: Flashcard,
    direction_class: &'static str,
    patcher: CardPatcher,
    can_edit: bool,
) -> Element {
    let mut editing = use_signal(|| false);
    let mut question = use_signal(String::new);
    let mut answer = use_signal(String::new);
    let mut revealed = use_signal(|| false);

    let id = flashcard.id.clone();
    let start = {
        let flashcard = flashcard.clone();
        move |_: MouseEvent| {
            question.set(flashcard.question.clone());
            answer.set(flashcard.answer.clone());
            editing.set(true);
        }
    };

    if editing() {
        let before = flashcard.clone();
        let save = move |evt: FormEvent| {
            evt.prevent_default();
            let next_question = question.read().clone();
            let next_answer = answer.read().clone();
            editing.set(false);
            let changed_question = (next_question != before.question).then_some(next_question);
            let changed_answer = (next_answer != before.answer).then_some(next_answer);
            if changed_question.is_none() && changed_answer.is_none() {
                return;
            }
            patcher.patch(CardPatch::EditFlashcard {
                flashcard_id: before.id.clone(),
                question: changed_question,
                answer: changed_answer,
            });
        };
        return rsx! {
            form { class: "flashcard flashcard--editing", onsubmit: save,
                label { "Question" }
                textarea {
                    value: "{question}",
                    oninput: move |evt| question.set(evt.value()),
                }
                label { "Answer" }
                textarea {
                    value: "{answer}",
                    oninput: move |evt| answer.set(evt.value()),
                }
                div { class: "form-actions",
                    button { class: "btn", r#type: "submit", "Save" }
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| editing.set(false),
                        "Cancel"
                    }
                }
            }
        };
    }

    rsx! {
        article { class: "flashcard {direction_class}",
            RichText { html: flashcard.question.clone(), class: "flashcard-question" }
            if revealed() {
                RichText { html: flashcard.answer.clone(), class: "flashcard-answer" }
            } else {
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| revealed.set(true),
                    "Show answer"
                }
            }
            if can_edit {
                div { class: "item-actions",
                    button { class: "btn btn-ghost", r#type: "button", onclick: start, "Edit" }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            patcher.patch(CardPatch::DeleteFlashcard {
                                flashcard_id: id.clone(),
                            });
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

#[component]
fn AddFlashcardForm(patcher: CardPatcher) -> Element {
    let mut question = use_signal(String::new);
    let mut answer = use_signal(String::new);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let q = question.read().trim().to_string();
        let a = answer.read().trim().to_string();
        if q.is_empty() || a.is_empty() {
            return;
        }
        patcher.patch(CardPatch::AddFlashcard {
            question: q,
            answer: a,
        });
        question.set(String::new());
        answer.set(String::new());
    };

    rsx! {
        form { class: "add-form", onsubmit: submit,
            h4 { "New flashcard" }
            input {
                r#type: "text",
                placeholder: "Question",
                value: "{question}",
                oninput: move |evt| question.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Answer",
                value: "{answer}",
                oninput: move |evt| answer.set(evt.value()),
            }
            button { class: "btn", r#type: "submit", "Add flashcard" }
        }
    }
}
