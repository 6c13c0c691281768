use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{CardPage, HomeView};
use crate::vm::CardQuery;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/cards/:card_id?:..query", CardPage)] Card { card_id: String, query: CardQuery },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            nav { class: "topbar",
                Link { class: "topbar-brand", to: Route::Home {}, "Decks" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
