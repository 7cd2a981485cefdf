use dioxus::prelude::*;

use crate::views::render::render_dom;
use crate::views::risk::RiskPanel;
use crate::views::{ErrorNotice, ViewState};
use crate::vm::{DashboardVm, ResultRowVm};

#[component]
pub fn DashboardView(state: ViewState<DashboardVm>) -> Element {
    rsx! {
        div { class: "page",
            h2 { "Dashboard" }

            match state {
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    DashboardBody { vm }
                },
                ViewState::Error(err) => rsx! {
                    ErrorNotice { message: err.message() }
                },
            }
        }
    }
}

#[component]
fn DashboardBody(vm: DashboardVm) -> Element {
    rsx! {
        section { class: "stats",
            StatCard { label: "Total Games", value: vm.total_games.to_string() }
            StatCard { label: "Average Score", value: vm.average_score_str.clone() }
            StatCard { label: "Highest Score", value: vm.highest_score_str.clone() }
            StatCard { label: "Last Played", value: vm.last_played_str.clone() }
        }

        if let Some(risk) = vm.risk.clone() {
            RiskPanel { risk }
        }

        section { class: "recent",
            h3 { "Recent Activity" }
            if vm.recent.is_empty() {
                p { "No games played yet. Start an assessment to see your results here." }
            } else {
                ResultTable { rows: vm.recent.clone() }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-label", "{label}" }
            strong { class: "stat-value", "{value}" }
        }
    }
}

#[component]
pub fn ResultTable(rows: Vec<ResultRowVm>) -> Element {
    rsx! {
        table { class: "results",
            thead {
                tr {
                    th { "Game" }
                    th { "Score" }
                    th { "Accuracy" }
                    th { "Played" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        td { "{row.game_label}" }
                        td { "{row.score_str}" }
                        td { "{row.accuracy_str}" }
                        td { "{row.played_at_str}" }
                    }
                }
            }
        }
    }
}

#[must_use]
pub fn render_dashboard(state: ViewState<DashboardVm>) -> String {
    render_dom(VirtualDom::new_with_props(
        DashboardView,
        DashboardViewProps { state },
    ))
}

#[must_use]
pub fn render_results(rows: Vec<ResultRowVm>) -> String {
    render_dom(VirtualDom::new_with_props(
        ResultTable,
        ResultTableProps { rows },
    ))
}
