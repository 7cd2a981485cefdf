use dioxus::prelude::*;

use crate::views::render::render_dom;
use crate::vm::GameCardVm;

#[component]
pub fn GamesView(cards: Vec<GameCardVm>) -> Element {
    rsx! {
        div { class: "page games",
            h2 { "Cognitive Games" }
            ul {
                for card in cards {
                    li { class: "game-card",
                        h3 { "{card.title}" }
                        p { "{card.description}" }
                        code { "play {card.slug}" }
                    }
                }
            }
        }
    }
}

#[must_use]
pub fn render_games(cards: Vec<GameCardVm>) -> String {
    render_dom(VirtualDom::new_with_props(GamesView, GamesViewProps { cards }))
}
