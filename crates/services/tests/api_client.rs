mod common;

use common::{StubResponse, StubServer, closed_port_url};
use mindcheck_core::model::{AssessmentSession, AudioClip, GameKind, GameResult, QuestionId, StageId};
use mindcheck_core::time::fixed_clock;
use serde_json::json;
use services::api::{HealthStatus, ResultFilters, SpeechTask};
use services::{ApiError, AuthSession, BackendClient, FailureKind, SubmissionPayload, check_endpoints};

fn signed_in() -> AuthSession {
    let mut session = AuthSession::new("a@b.com").with_token("tok-123");
    session.user_id = Some("user-7".into());
    session
}

#[tokio::test]
async fn submit_tests_sends_multipart_form() {
    let mut server = StubServer::start(vec![StubResponse::json(
        200,
        json!({
            "summary_report": "All good",
            "cognitive_risk": {"probability": 0.12, "category": "Low"},
            "pdf_filename": "doctor_report_1.pdf"
        }),
    )])
    .await;
    let client = BackendClient::new(&server.base_url, Some(signed_in())).expect("client");

    let mut session = AssessmentSession::new();
    session.set_score(StageId::Memory, Some(5));
    session.set_score(StageId::Stroop, Some(120));
    session.set_audio_recording(QuestionId::Q1, Some(AudioClip::webm(b"WEBMDATA".to_vec())));
    session.set_audio_recording(
        QuestionId::Q3,
        Some(AudioClip::new(b"RIFFDATA".to_vec(), "audio/wav")),
    );
    let payload = SubmissionPayload::from_session(&session, "a@b.com");

    let response = client.submit_tests(payload).await.expect("submit");
    assert_eq!(response.summary_report.as_deref(), Some("All good"));
    assert_eq!(
        response.cognitive_risk.and_then(|r| r.category).as_deref(),
        Some("Low")
    );
    assert_eq!(response.pdf_filename.as_deref(), Some("doctor_report_1.pdf"));

    let request = server.next_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/submit-tests");
    assert_eq!(request.header("authorization"), Some("Bearer tok-123"));

    assert_eq!(request.field("user_email").as_deref(), Some("a@b.com"));
    assert_eq!(request.field("memory_score").as_deref(), Some("5"));
    assert_eq!(request.field("stroop_score").as_deref(), Some("120"));
    assert_eq!(request.field("image_recall_score").as_deref(), Some("0"));

    let q1 = request.part("audio_q1").expect("audio_q1 part");
    assert_eq!(q1.file_name.as_deref(), Some("audio_q1.webm"));
    assert_eq!(q1.content_type.as_deref(), Some("audio/webm"));
    assert_eq!(q1.data, b"WEBMDATA");

    let q3 = request.part("audio_q3").expect("audio_q3 part");
    assert_eq!(q3.content_type.as_deref(), Some("audio/wav"));
    assert_eq!(q3.data, b"RIFFDATA");

    assert!(request.part("audio_q2").is_none());
    assert!(request.part("audio_q4").is_none());
}

#[tokio::test]
async fn error_statuses_are_classified() {
    let server = StubServer::start(vec![StubResponse::status(503), StubResponse::status(404)]).await;
    let client = BackendClient::new(&server.base_url, None).expect("client");

    let err = client.risk_score().await.expect_err("503");
    assert_eq!(err.kind(), FailureKind::Retryable);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));

    let err = client.risk_score().await.expect_err("404");
    assert_eq!(err.kind(), FailureKind::Fatal);
}

#[tokio::test]
async fn unreachable_backend_is_retryable() {
    let client = BackendClient::new(&closed_port_url().await, None).expect("client");
    let err = client
        .results(&ResultFilters::default())
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(err.is_retryable());

    match client.health().await {
        HealthStatus::Unreachable(reason) => assert!(reason.contains("/health")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn results_pass_filters_and_parse_records() {
    let mut server = StubServer::start(vec![StubResponse::json(
        200,
        json!([
            {"gameType": "memory", "score": 7, "timestamp": "2024-09-20T10:00:00Z"},
            {"gameType": "stroop", "score": 130, "accuracy": 91.5, "timestamp": "2024-09-21T10:00:00Z"}
        ]),
    )])
    .await;
    let client = BackendClient::new(&server.base_url, Some(signed_in())).expect("client");

    let filters = ResultFilters {
        game_type: Some("stroop".into()),
        limit: Some(5),
        period: None,
    };
    let records = client.results(&filters).await.expect("results");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].accuracy, Some(91.5));

    let request = server.next_request().await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/results?gameType=stroop&limit=5");
}

#[tokio::test]
async fn non_json_body_is_rejected_where_json_is_expected() {
    let server = StubServer::start(vec![StubResponse::bytes("text/html", b"<html></html>")]).await;
    let client = BackendClient::new(&server.base_url, None).expect("client");
    let err = client.risk_score().await.expect_err("html");
    assert!(matches!(err, ApiError::NotJson { ref content_type, .. } if content_type == "text/html"));
    assert_eq!(err.kind(), FailureKind::Fatal);
}

#[tokio::test]
async fn download_report_returns_raw_bytes() {
    let mut server = StubServer::start(vec![StubResponse::bytes("application/pdf", b"%PDF-1.4")]).await;
    let client = BackendClient::new(&server.base_url, Some(signed_in())).expect("client");

    let bytes = client.download_report(Some("abc 1")).await.expect("download");
    assert_eq!(bytes, b"%PDF-1.4");
    let request = server.next_request().await;
    assert_eq!(request.target, "/api/results/report/abc%201");
}

#[tokio::test]
async fn game_results_are_posted_as_json() {
    let mut server = StubServer::start(vec![StubResponse::json(200, json!({"ok": true}))]).await;
    let client = BackendClient::new(&server.base_url, Some(signed_in()))
        .expect("client")
        .with_clock(fixed_clock());

    let result = GameResult::new(GameKind::ImageRecall, 12, 80, 95).with_meta("levels", 5);
    client.submit_game_results(&result).await.expect("post");

    let body = server.next_request().await.json();
    assert_eq!(body["userId"], "user-7");
    assert_eq!(body["gameType"], "image_recall");
    assert_eq!(body["score"], 12);
    assert_eq!(body["accuracy"], 80);
    assert_eq!(body["duration"], 95);
    assert_eq!(body["metadata"]["levels"], "5");
    assert_eq!(body["timestamp"], "2023-11-14T22:13:20Z");
}

#[tokio::test]
async fn speech_upload_carries_task_fields() {
    let mut server = StubServer::start(vec![StubResponse::json(200, json!({"id": 1}))]).await;
    let client = BackendClient::new(&server.base_url, Some(signed_in()))
        .expect("client")
        .with_clock(fixed_clock());

    let task = SpeechTask {
        task_type: "picture-description".into(),
        prompt: QuestionId::Q2.prompt().into(),
        duration_secs: 42,
    };
    client
        .upload_speech(AudioClip::webm(vec![1, 2, 3]), &task)
        .await
        .expect("upload");

    let request = server.next_request().await;
    assert_eq!(request.target, "/api/speech/upload");
    let audio = request.part("audio").expect("audio part");
    assert_eq!(
        audio.file_name.as_deref(),
        Some("speech-recording-1700000000000.webm")
    );
    assert_eq!(audio.data, vec![1, 2, 3]);
    assert_eq!(request.field("taskType").as_deref(), Some("picture-description"));
    assert_eq!(request.field("duration").as_deref(), Some("42"));
    assert_eq!(request.field("userId").as_deref(), Some("user-7"));
}

#[tokio::test]
async fn sentiment_request_carries_text_and_context() {
    let mut server = StubServer::start(vec![
        StubResponse::json(200, json!({"sentiment": "positive", "score": 0.8})),
        StubResponse::json(200, json!({"sentiment": "neutral"})),
    ])
    .await;
    let client = BackendClient::new(&server.base_url, Some(signed_in()))
        .expect("client")
        .with_clock(fixed_clock());

    let analysis = client
        .sentiment_analysis("I walked to the park", Some("speech-fluency-test"))
        .await
        .expect("sentiment");
    assert_eq!(analysis["sentiment"], "positive");

    let request = server.next_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/sentiment-analysis");
    assert_eq!(request.header("authorization"), Some("Bearer tok-123"));
    let body = request.json();
    assert_eq!(body["userId"], "user-7");
    assert_eq!(body["text"], "I walked to the park");
    assert_eq!(body["context"], "speech-fluency-test");
    assert_eq!(body["timestamp"], "2023-11-14T22:13:20Z");

    client
        .sentiment_analysis("hello", None)
        .await
        .expect("default context");
    assert_eq!(server.next_request().await.json()["context"], "cognitive-assessment");
}

#[tokio::test]
async fn endpoint_check_reports_each_endpoint() {
    let server = StubServer::start(vec![
        StubResponse::json(200, json!({"status": "ok"})),
        StubResponse::json(200, json!({"ok": true})),
        StubResponse::status(500),
        StubResponse::json(200, json!({"results": []})),
    ])
    .await;
    let client = BackendClient::new(&server.base_url, None).expect("client");

    let checks = check_endpoints(&client).await;
    let summary: Vec<_> = checks.iter().map(|c| (c.name, c.ok)).collect();
    assert_eq!(
        summary,
        vec![
            ("Health Check", true),
            ("Game Results", true),
            ("Risk Score", false),
            ("User Results", true),
        ]
    );
    assert!(checks[2].detail.as_deref().is_some_and(|d| d.contains("500")));
}
