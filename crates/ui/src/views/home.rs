use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::CardQuery;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut card_input = use_signal(String::new);

    let launch_card = ctx.take_initial_card();
    use_effect(move || {
        if let Some(card_id) = launch_card.clone() {
            navigator.replace(Route::Card {
                card_id: card_id.to_string(),
                query: CardQuery::default(),
            });
        }
    });

    let signed_in = ctx
        .current_user()
        .map_or_else(|| "Browsing anonymously".to_string(), |u| format!("Signed in as {}", u.display_name()));
    let open_card = move |_| {
        let card_id = card_input.read().trim().to_string();
        if card_id.is_empty() {
            return;
        }
        navigator.push(Route::Card {
            card_id,
            query: CardQuery::default(),
        });
    };

    rsx! {
        div { class: "page home",
            h2 { "Shared decks" }
            p { class: "home-user", "{signed_in}" }
            if let Some(card_id) = ctx.initial_card() {
                p {
                    dioxus_router::Link {
                        to: Route::Card {
                            card_id: card_id.to_string(),
                            query: CardQuery::default(),
                        },
                        "Open {card_id}"
                    }
                }
            }
            form {
                class: "home-open",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    open_card(());
                },
                input {
                    r#type: "text",
                    placeholder: "Card id",
                    value: "{card_input}",
                    oninput: move |evt| card_input.set(evt.value()),
                }
                button { class: "btn", r#type: "submit", "Open" }
            }
        }
    }
}
