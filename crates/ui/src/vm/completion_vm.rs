use mindcheck_core::model::{AssessmentSession, QuestionId, StageId, SubmissionState};
use services::api::SubmitResponse;

use crate::vm::risk_vm::RiskVm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Submission has not been attempted yet.
    Pending,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreLineVm {
    pub label: &'static str,
    pub value: String,
}

/// The closing screen of an assessment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionVm {
    pub status: CompletionStatus,
    pub scores: Vec<ScoreLineVm>,
    /// "3 of 4 questions recorded".
    pub recordings_label: String,
    pub summary_report: Option<String>,
    pub doctor_report: Option<String>,
    pub risk: Option<RiskVm>,
    pub pdf_filename: Option<String>,
    /// Set when the backend finished only part of its analysis.
    pub partial_notice: Option<String>,
}

impl CompletionVm {
    #[must_use]
    pub fn new(session: &AssessmentSession, response: Option<&SubmitResponse>) -> Self {
        let status = match session.submission_state() {
            SubmissionState::Idle => CompletionStatus::Pending,
            SubmissionState::Submitting => CompletionStatus::Submitting,
            SubmissionState::Succeeded => CompletionStatus::Succeeded,
            SubmissionState::Failed => CompletionStatus::Failed(
                session
                    .error_message()
                    .unwrap_or("Submission failed")
                    .to_string(),
            ),
        };

        let scores = StageId::scored()
            .map(|stage| ScoreLineVm {
                label: stage.title(),
                value: session
                    .score(stage)
                    .map_or_else(|| "-".to_string(), |score| score.to_string()),
            })
            .collect();

        let recordings_label = format!(
            "{} of {} questions recorded",
            session.recording_count(),
            QuestionId::ALL.len()
        );

        Self {
            status,
            scores,
            recordings_label,
            summary_report: response.and_then(|r| r.summary_report.clone()),
            doctor_report: response.and_then(|r| r.doctor_report.clone()),
            risk: response
                .and_then(|r| r.cognitive_risk.as_ref())
                .map(RiskVm::from),
            pdf_filename: response.and_then(|r| r.pdf_filename.clone()),
            partial_notice: response.and_then(|r| r.ai_error.as_ref()).map(|_| {
                "Some advanced analysis features were temporarily unavailable. \
                 Basic assessment completed successfully."
                    .to_string()
            }),
        }
    }

    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self.status {
            CompletionStatus::Pending => "Ready to Submit",
            CompletionStatus::Submitting => "Analyzing Your Assessment",
            CompletionStatus::Succeeded => "Assessment Complete!",
            CompletionStatus::Failed(_) => "Submission Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use mindcheck_core::model::AudioClip;
    use services::api::CognitiveRisk;

    use super::*;

    #[test]
    fn succeeded_session_shows_scores_and_risk() {
        let mut session = AssessmentSession::new();
        session.set_score(StageId::Memory, Some(5));
        session.set_score(StageId::Stroop, Some(120));
        session.set_audio_recording(QuestionId::Q2, Some(AudioClip::webm(vec![1])));
        session.begin_submission();
        session.mark_succeeded();
        let response = SubmitResponse {
            summary_report: Some("Stable".into()),
            cognitive_risk: Some(CognitiveRisk {
                probability: Some(0.4),
                category: Some("moderate".into()),
                disclaimer: None,
            }),
            ai_error: Some("timeout".into()),
            ..SubmitResponse::default()
        };

        let vm = CompletionVm::new(&session, Some(&response));
        assert_eq!(vm.headline(), "Assessment Complete!");
        assert_eq!(vm.scores[0].value, "5");
        assert_eq!(vm.scores[2].value, "-");
        assert_eq!(vm.recordings_label, "1 of 4 questions recorded");
        assert_eq!(vm.summary_report.as_deref(), Some("Stable"));
        assert_eq!(vm.risk.map(|r| r.tone.colour()), Some("orange"));
        assert!(vm.partial_notice.is_some());
    }

    #[test]
    fn failed_session_carries_message() {
        let mut session = AssessmentSession::new();
        session.begin_submission();
        session.mark_failed("backend returned 500");
        let vm = CompletionVm::new(&session, None);
        assert_eq!(
            vm.status,
            CompletionStatus::Failed("backend returned 500".into())
        );
        assert!(vm.risk.is_none());
    }
}
