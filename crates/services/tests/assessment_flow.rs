mod common;

use std::sync::Arc;

use common::{StubResponse, StubServer};
use mindcheck_core::model::{AudioClip, QuestionId, StageId, SubmissionState};
use serde_json::json;
use services::{Advance, AssessmentFlow, BackendClient, FlowError};

#[tokio::test]
async fn full_assessment_submits_once_and_succeeds() {
    let mut server = StubServer::start(vec![StubResponse::json(
        200,
        json!({"summary_report": "Report", "evaluation": {"memory": "normal"}}),
    )])
    .await;
    let client = BackendClient::new(&server.base_url, None).expect("client");
    let mut flow = AssessmentFlow::new(Arc::new(client));

    assert_eq!(flow.current_stage(), StageId::Memory);
    flow.record_score(StageId::Memory, 5);
    assert_eq!(flow.advance(), Advance::Moved(StageId::Stroop));
    flow.record_score(StageId::Stroop, 120);
    assert_eq!(flow.advance(), Advance::Moved(StageId::ImageRecall));
    flow.record_score(StageId::ImageRecall, 8);
    assert_eq!(flow.advance(), Advance::Moved(StageId::Speech));
    flow.record_recording(QuestionId::Q1, Some(AudioClip::webm(vec![0x1a, 0x45])));
    assert_eq!(flow.advance(), Advance::ReadyToSubmit);

    let response = flow.submit("a@b.com").await.expect("submit");
    assert_eq!(response.summary_report.as_deref(), Some("Report"));
    assert_eq!(flow.session().submission_state(), SubmissionState::Succeeded);

    let request = server.next_request().await;
    for (name, value) in [
        ("user_email", "a@b.com"),
        ("memory_score", "5"),
        ("stroop_score", "120"),
        ("image_recall_score", "8"),
    ] {
        assert_eq!(request.field(name).as_deref(), Some(value), "field {name}");
    }
    let audio = request.part("audio_q1").expect("audio_q1 part");
    assert_eq!(audio.file_name.as_deref(), Some("audio_q1.webm"));
    assert_eq!(request.parts.len(), 5);
    assert!(server.try_next_request().is_none());
}

#[tokio::test]
async fn backend_failure_marks_session_failed() {
    let mut server = StubServer::start(vec![StubResponse::status(500)]).await;
    let client = BackendClient::new(&server.base_url, None).expect("client");
    let mut flow = AssessmentFlow::new(Arc::new(client));
    flow.record_score(StageId::Memory, 2);

    let err = flow.submit("a@b.com").await.expect_err("500");
    match err {
        FlowError::Api(api) => assert!(api.is_retryable()),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(flow.session().submission_state(), SubmissionState::Failed);
    assert!(
        flow.session()
            .error_message()
            .is_some_and(|m| m.contains("500"))
    );
    assert_eq!(flow.session().score(StageId::Memory), Some(2));

    server.next_request().await;
    assert!(server.try_next_request().is_none());
}
