use dioxus::prelude::*;

use crate::views::render::render_dom;
use crate::vm::{AssessmentProgressVm, StageStepVm};

#[component]
pub fn ProgressHeader(vm: AssessmentProgressVm) -> Element {
    let width = format!("width: {}%", vm.percent);
    rsx! {
        header { class: "assessment-progress",
            h2 { "{vm.stage_title}" }
            p { class: "step", "{vm.step_label}" }
            div { class: "progress-track",
                div { class: "progress-bar", style: "{width}" }
            }
            ol { class: "steps",
                for step in vm.steps.clone() {
                    StepItem { step }
                }
            }
            nav {
                if vm.can_go_back {
                    button { class: "back", "Back" }
                }
                button { class: "next", "{vm.next_label}" }
            }
        }
    }
}

#[component]
fn StepItem(step: StageStepVm) -> Element {
    let class = if step.current {
        "step-current"
    } else if step.done {
        "step-done"
    } else {
        "step-todo"
    };
    rsx! {
        li { class: "{class}", "{step.title}" }
    }
}

#[must_use]
pub fn render_progress(vm: AssessmentProgressVm) -> String {
    render_dom(VirtualDom::new_with_props(
        ProgressHeader,
        ProgressHeaderProps { vm },
    ))
}
