use dioxus::prelude::*;

use crate::views::render::render_dom;
use crate::views::risk::RiskPanel;
use crate::vm::{CompletionStatus, CompletionVm};

#[component]
pub fn CompletionView(vm: CompletionVm) -> Element {
    let headline = vm.headline();
    rsx! {
        div { class: "page completion",
            h2 { "{headline}" }

            match vm.status.clone() {
                CompletionStatus::Pending => rsx! {
                    p { "Your answers are ready to be sent for analysis." }
                },
                CompletionStatus::Submitting => rsx! {
                    p { "Processing..." }
                },
                CompletionStatus::Succeeded => rsx! {
                    p { "Your cognitive analysis is ready." }
                },
                CompletionStatus::Failed(message) => rsx! {
                    p { class: "error", "{message}" }
                },
            }

            if let Some(risk) = vm.risk.clone() {
                RiskPanel { risk }
            }

            section { class: "scores",
                h3 { "Test Scores" }
                ul {
                    for line in vm.scores.clone() {
                        li { "{line.label}: {line.value}" }
                    }
                }
                p { "{vm.recordings_label}" }
            }

            if let Some(summary) = vm.summary_report.clone() {
                section { class: "summary",
                    h3 { "Assessment Summary" }
                    p { "{summary}" }
                }
            }
            if let Some(report) = vm.doctor_report.clone() {
                section { class: "clinical",
                    h3 { "Detailed Clinical Report" }
                    pre { "{report}" }
                }
            }
            if let Some(notice) = vm.partial_notice.clone() {
                p { class: "notice", "{notice}" }
            }
            if let Some(file) = vm.pdf_filename.clone() {
                p { class: "report-file", "Report: {file}" }
            }
        }
    }
}

#[must_use]
pub fn render_completion(vm: CompletionVm) -> String {
    render_dom(VirtualDom::new_with_props(
        CompletionView,
        CompletionViewProps { vm },
    ))
}
