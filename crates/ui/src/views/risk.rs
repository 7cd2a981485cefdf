use dioxus::prelude::*;

use crate::vm::RiskVm;

#[component]
pub fn RiskPanel(risk: RiskVm) -> Element {
    let class = format!("risk {}", risk.tone.css_class());
    rsx! {
        section { class: "risk-panel",
            h3 { "Cognitive Risk Assessment" }
            div { class: "{class}",
                if let Some(probability) = risk.probability_str.clone() {
                    strong { "{probability}" }
                }
                if let Some(score) = risk.score_str.clone() {
                    strong { "Score {score}" }
                }
                p { "{risk.label}" }
            }
            if let Some(disclaimer) = risk.disclaimer.clone() {
                p { class: "disclaimer", "{disclaimer}" }
            }
        }
    }
}
