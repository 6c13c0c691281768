use dioxus::prelude::*;

use crate::vm::{DiffSpan, display_or, highlight_spans};

/// Sanitised rich-text body.
#[component]
pub fn RichText(html: String, class: String) -> Element {
    let clean = display_or(&html, "(empty)");
    rsx! {
        div { class: "rich-text {class}", dangerous_inner_html: "{clean}" }
    }
}

#[component]
pub fn Highlighted(text: String, query: String) -> Element {
    rsx! {
        for (idx, span) in highlight_spans(&text, &query).into_iter().enumerate() {
            span {
                key: "{idx}",
                class: if span.is_match { "hl-match" } else { "hl-text" },
                "{span.text}"
            }
        }
    }
}

#[component]
pub fn DiffText(spans: Vec<DiffSpan>, changed_class: String) -> Element {
    rsx! {
        p { class: "diff-text",
            for (idx, span) in spans.into_iter().enumerate() {
                span {
                    key: "{idx}",
                    class: if span.changed { "{changed_class}" } else { "diff-same" },
                    "{span.text}"
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

#[component]
pub fn Banner(kind: BannerKind, message: String, on_dismiss: Option<Callback<()>>) -> Element {
    let class = match kind {
        BannerKind::Info => "banner banner--info",
        BannerKind::Error => "banner banner--error",
    };
    rsx! {
        div { class: "{class}", role: "status",
            span { class: "banner-text", "{message}" }
            if let Some(on_dismiss) = on_dismiss {
                button {
                    class: "banner-dismiss",
                    r#type: "button",
                    aria_label: "Dismiss",
                    onclick: move |_| on_dismiss.call(()),
                    "×"
                }
            }
        }
    }
}

/// Previous / position / next controls shared by the flashcard and quiz panes.
#[component]
pub fn Pager(
    position: usize,
    len: usize,
    original: Option<usize>,
    total: usize,
    noun: String,
    on_previous: Callback<()>,
    on_next: Callback<()>,
    on_jump: Callback<usize>,
) -> Element {
    let mut jump_value = use_signal(String::new);
    let filtered = len != total;

    rsx! {
        div { class: "pager",
            button {
                class: "btn pager-prev",
                r#type: "button",
                disabled: len < 2,
                onclick: move |_| on_previous.call(()),
                "‹"
            }
            span { class: "pager-label",
                if let Some(original) = original {
                    "{noun} #{original} of {total}"
                }
                if filtered {
                    span { class: "pager-matches", " · match {position} of {len}" }
                }
            }
            button {
                class: "btn pager-next",
                r#type: "button",
                disabled: len < 2,
                onclick: move |_| on_next.call(()),
                "›"
            }
            form {
                class: "pager-jump",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    if let Ok(target) = jump_value.read().trim().parse::<usize>() {
                        on_jump.call(target);
                    }
                    jump_value.set(String::new());
                },
                input {
                    r#type: "number",
                    min: "1",
                    max: "{len}",
                    placeholder: "Go to",
                    value: "{jump_value}",
                    oninput: move |evt| jump_value.set(evt.value()),
                }
            }
        }
    }
}
