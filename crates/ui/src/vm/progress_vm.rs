use mindcheck_core::model::AssessmentSession;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageStepVm {
    pub title: &'static str,
    pub done: bool,
    pub current: bool,
}

/// Header shown above each assessment stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentProgressVm {
    pub stage_title: &'static str,
    /// "Step 2 of 4".
    pub step_label: String,
    pub percent: u8,
    pub can_go_back: bool,
    /// "Next" until the last stage, then "Submit".
    pub next_label: &'static str,
    pub steps: Vec<StageStepVm>,
}

impl From<&AssessmentSession> for AssessmentProgressVm {
    fn from(session: &AssessmentSession) -> Self {
        let progress = session.progress();
        let current = session.current_index();
        Self {
            stage_title: session.current_stage().title(),
            step_label: format!("Step {} of {}", progress.position, progress.total),
            percent: progress.percent(),
            can_go_back: current > 0,
            next_label: if session.is_final_stage() { "Submit" } else { "Next" },
            steps: session
                .stages()
                .iter()
                .enumerate()
                .map(|(idx, stage)| StageStepVm {
                    title: stage.title(),
                    done: idx < current,
                    current: idx == current,
                })
                .collect(),
        }
    }
}
