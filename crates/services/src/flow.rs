//! The assessment flow: four stages, one owner, one submission.
//!
//! Stage runners never touch the session directly. They read it through
//! [`AssessmentFlow::session`] and hand results back through `record_*`.

use std::sync::Arc;

use mindcheck_core::model::{
    AssessmentSession, AudioClip, QuestionId, StageId, StageProgress, SubmissionState,
};

use crate::api::{AssessmentApi, SubmissionPayload, SubmitResponse};
use crate::error::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(StageId),
    /// Already on the last stage; the next step is submitting.
    ReadyToSubmit,
}

pub struct AssessmentFlow {
    session: AssessmentSession,
    api: Arc<dyn AssessmentApi>,
    last_response: Option<SubmitResponse>,
}

impl AssessmentFlow {
    #[must_use]
    pub fn new(api: Arc<dyn AssessmentApi>) -> Self {
        Self::with_session(api, AssessmentSession::new())
    }

    #[must_use]
    pub fn with_session(api: Arc<dyn AssessmentApi>, session: AssessmentSession) -> Self {
        Self {
            session,
            api,
            last_response: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    #[must_use]
    pub fn current_stage(&self) -> StageId {
        self.session.current_stage()
    }

    #[must_use]
    pub fn progress(&self) -> StageProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn last_response(&self) -> Option<&SubmitResponse> {
        self.last_response.as_ref()
    }

    pub fn record_score(&mut self, stage: StageId, score: i64) {
        tracing::debug!(target: "flow", stage = stage.as_str(), score, "score_recorded");
        self.session.set_score(stage, Some(score));
    }

    pub fn record_recording(&mut self, question: QuestionId, clip: Option<AudioClip>) {
        tracing::debug!(
            target: "flow",
            question = question.form_field(),
            bytes = clip.as_ref().map_or(0, AudioClip::len),
            "recording_recorded"
        );
        self.session.set_audio_recording(question, clip);
    }

    pub fn advance(&mut self) -> Advance {
        if self.session.next() {
            Advance::Moved(self.session.current_stage())
        } else {
            Advance::ReadyToSubmit
        }
    }

    /// Step back one stage. Returns false on the first stage.
    pub fn back(&mut self) -> bool {
        self.session.prev()
    }

    /// Start over: first stage, no scores, no recordings, idle.
    pub fn reset(&mut self) {
        self.session.reset();
        self.last_response = None;
    }

    /// Post the collected scores and recordings once.
    ///
    /// A failure leaves the session in `Failed` with the error message, ready
    /// for a manual retry; nothing is retried here.
    ///
    /// Two guards sit in front of the request: a blank email is refused, and
    /// so is a second submission once one has succeeded or while one is in
    /// flight. The session itself does not enforce either.
    ///
    /// # Errors
    ///
    /// `FlowError::MissingEmail`, `AlreadySubmitting` or `AlreadySubmitted`
    /// before any request; `FlowError::Api` when the request fails.
    pub async fn submit(&mut self, user_email: &str) -> Result<&SubmitResponse, FlowError> {
        let email = user_email.trim();
        if email.is_empty() {
            return Err(FlowError::MissingEmail);
        }
        match self.session.submission_state() {
            SubmissionState::Submitting => return Err(FlowError::AlreadySubmitting),
            SubmissionState::Succeeded => return Err(FlowError::AlreadySubmitted),
            SubmissionState::Idle | SubmissionState::Failed => {}
        }

        let payload = SubmissionPayload::from_session(&self.session, email);
        self.session.begin_submission();
        tracing::info!(
            target: "flow",
            fields = payload.field_names().len(),
            recordings = payload.audio.len(),
            "submission_started"
        );

        match self.api.submit_tests(payload).await {
            Ok(response) => {
                self.session.mark_succeeded();
                tracing::info!(
                    target: "flow",
                    has_report = response.summary_report.is_some(),
                    "submission_succeeded"
                );
                Ok(&*self.last_response.insert(response))
            }
            Err(err) => {
                self.session.mark_failed(err.to_string());
                tracing::warn!(
                    target: "flow",
                    error = %err,
                    retryable = err.is_retryable(),
                    "submission_failed"
                );
                Err(FlowError::Api(err))
            }
        }
    }
}

impl std::fmt::Debug for AssessmentFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentFlow")
            .field("session", &self.session)
            .field("last_response", &self.last_response)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::error::ApiError;

    #[derive(Default)]
    struct FakeApi {
        fail_with: Option<u16>,
        seen: Mutex<Vec<SubmissionPayload>>,
    }

    #[async_trait]
    impl AssessmentApi for FakeApi {
        async fn submit_tests(
            &self,
            payload: SubmissionPayload,
        ) -> Result<SubmitResponse, ApiError> {
            self.seen.lock().unwrap().push(payload);
            match self.fail_with {
                Some(code) => Err(ApiError::Status {
                    endpoint: "/api/submit-tests".into(),
                    status: StatusCode::from_u16(code).unwrap(),
                    body: String::new(),
                }),
                None => Ok(SubmitResponse {
                    summary_report: Some("fine".into()),
                    ..SubmitResponse::default()
                }),
            }
        }
    }

    fn flow(api: &Arc<FakeApi>) -> AssessmentFlow {
        AssessmentFlow::new(api.clone())
    }

    #[test]
    fn advance_stops_at_final_stage() {
        let api = Arc::new(FakeApi::default());
        let mut flow = flow(&api);
        assert_eq!(flow.advance(), Advance::Moved(StageId::Stroop));
        assert_eq!(flow.advance(), Advance::Moved(StageId::ImageRecall));
        assert_eq!(flow.advance(), Advance::Moved(StageId::Speech));
        assert_eq!(flow.advance(), Advance::ReadyToSubmit);
        assert_eq!(flow.current_stage(), StageId::Speech);
        assert!(flow.back());
        assert_eq!(flow.current_stage(), StageId::ImageRecall);
    }

    #[tokio::test]
    async fn successful_submission() {
        let api = Arc::new(FakeApi::default());
        let mut flow = flow(&api);
        flow.record_score(StageId::Memory, 5);
        flow.record_score(StageId::Stroop, 120);
        flow.record_score(StageId::ImageRecall, 8);
        flow.record_recording(QuestionId::Q1, Some(AudioClip::webm(vec![1, 2])));

        let response = flow.submit("a@b.com").await.unwrap();
        assert_eq!(response.summary_report.as_deref(), Some("fine"));
        assert_eq!(flow.session().submission_state(), SubmissionState::Succeeded);

        let seen = api.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].memory_score, 5);
        assert_eq!(seen[0].stroop_score, 120);
        assert_eq!(seen[0].image_recall_score, 8);
        assert_eq!(seen[0].audio.len(), 1);
        assert_eq!(seen[0].user_email, "a@b.com");
    }

    #[tokio::test]
    async fn failure_is_recorded_and_not_retried() {
        let api = Arc::new(FakeApi {
            fail_with: Some(503),
            ..FakeApi::default()
        });
        let mut flow = flow(&api);

        let err = flow.submit("a@b.com").await.unwrap_err();
        match err {
            FlowError::Api(api_err) => assert!(api_err.is_retryable()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(flow.session().submission_state(), SubmissionState::Failed);
        assert!(flow.session().error_message().unwrap().contains("503"));
        assert_eq!(api.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_submission_can_be_retried_by_hand() {
        let api = Arc::new(FakeApi {
            fail_with: Some(400),
            ..FakeApi::default()
        });
        let mut flow = flow(&api);
        assert!(flow.submit("a@b.com").await.is_err());
        assert!(flow.submit("a@b.com").await.is_err());
        assert_eq!(api.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_submit_after_success_is_rejected() {
        let api = Arc::new(FakeApi::default());
        let mut flow = flow(&api);
        flow.submit("a@b.com").await.unwrap();
        assert!(matches!(
            flow.submit("a@b.com").await,
            Err(FlowError::AlreadySubmitted)
        ));
        assert!(matches!(flow.submit("  ").await, Err(FlowError::MissingEmail)));
        assert_eq!(api.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let api = Arc::new(FakeApi::default());
        let mut flow = flow(&api);
        flow.record_score(StageId::Memory, 3);
        flow.advance();
        flow.reset();
        assert_eq!(flow.current_stage(), StageId::Memory);
        assert_eq!(flow.session().score(StageId::Memory), None);
        assert!(flow.last_response().is_none());
    }
}
