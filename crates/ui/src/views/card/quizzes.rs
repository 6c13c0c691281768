use deck_core::model::{CardPatch, MAX_OPTIONS, MIN_OPTIONS, Quiz};
use dioxus::prelude::*;

use crate::hooks::{CardPatcher, EditCardManager};

use super::components::{Pager, RichText};

#[component]
pub fn QuizzesPane(manager: EditCardManager, patcher: CardPatcher, can_edit: bool) -> Element {
    let len = manager.len();
    let search = manager.search.read().clone();
    let (_, total) = manager.totals();

    let on_previous = use_callback(move |()| manager.previous());
    let on_next = use_callback(move |()| manager.next());
    let on_jump = use_callback(move |position: usize| manager.jump(position));

    let body = match manager.current_quiz() {
        Some(quiz) => rsx! {
            Pager {
                position: manager.index() + 1,
                len,
                original: manager.quiz_original_position(),
                total,
                noun: "Quiz",
                on_previous,
                on_next,
                on_jump,
            }
            QuizBody {
                key: "{quiz.id}",
                quiz: quiz.clone(),
                direction_class: manager.direction().class(),
                patcher,
                can_edit,
            }
        },
        None if !search.is_empty() => rsx! {
            p { class: "empty", "No quizzes match “{search}”." }
        },
        None => rsx! {
            p { class: "empty", "This card has no quizzes yet." }
        },
    };

    rsx! {
        section { class: "pane quizzes-pane",
            {body}
            if can_edit {
                AddQuizForm { patcher }
            }
        }
    }
}

#[component]
fn QuizBody(quiz: Quiz, direction_class: &'static str, patcher: CardPatcher, can_edit: bool) -> Element {
    let mut new_option = use_signal(String::new);
    let stored = quiz.options().len();
    let capacity = quiz.max_stored_options();
    let quiz_id = quiz.id.clone();
    let delete_id = quiz.id.clone();

    let submit_option = move |evt: FormEvent| {
        evt.prevent_default();
        let raw = new_option.read().clone();
        patcher.add_option(quiz_id.clone(), raw);
        new_option.set(String::new());
    };

    rsx! {
        article { class: "quiz {direction_class}",
            RichText { html: quiz.question.clone(), class: "quiz-question" }
            div { class: "quiz-answer",
                span { class: "quiz-tag", "Answer" }
                RichText { html: quiz.answer.clone(), class: "" }
            }
            div { class: "quiz-options",
                span { class: "quiz-tag", "Options {stored}/{capacity}" }
                if stored == 0 {
                    p { class: "muted", "No options yet." }
                }
                ul {
                    for (idx, option) in quiz.options().iter().enumerate() {
                        li { key: "{idx}", class: "quiz-option", "{option}" }
                    }
                }
            }
            if can_edit && quiz.can_add_option() {
                form { class: "add-option", onsubmit: submit_option,
                    input {
                        r#type: "text",
                        placeholder: "Another option",
                        value: "{new_option}",
                        oninput: move |evt| new_option.set(evt.value()),
                    }
                    button { class: "btn", r#type: "submit", "Add option" }
                }
            }
            if can_edit {
                div { class: "item-actions",
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            patcher.patch(CardPatch::DeleteQuiz {
                                quiz_id: delete_id.clone(),
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
fn AddQuizForm(patcher: CardPatcher) -> Element {
    let mut question = use_signal(String::new);
    let mut answer = use_signal(String::new);
    let mut minimum = use_signal(|| MAX_OPTIONS);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let q = question.read().trim().to_string();
        let a = answer.read().trim().to_string();
        if q.is_empty() || a.is_empty() {
            return;
        }
        patcher.patch(CardPatch::AddQuiz {
            question: q,
            answer: a,
            minimum_options: minimum(),
        });
        question.set(String::new());
        answer.set(String::new());
    };

    rsx! {
        form { class: "add-form", onsubmit: submit,
            h4 { "New quiz" }
            input {
                r#type: "text",
                placeholder: "Question",
                value: "{question}",
                oninput: move |evt| question.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Correct answer",
                value: "{answer}",
                oninput: move |evt| answer.set(evt.value()),
            }
            label { "Choices "
                select {
                    value: "{minimum}",
                    onchange: move |evt| {
                        if let Ok(value) = evt.value().parse::<u8>() {
                            minimum.set(value.clamp(MIN_OPTIONS, MAX_OPTIONS));
                        }
                    },
                    for count in MIN_OPTIONS..=MAX_OPTIONS {
                        option { key: "{count}", value: "{count}", "{count}" }
                    }
                }
            }
            button { class: "btn", r#type: "submit", "Add quiz" }
        }
    }
}
