use chrono::Duration;
use mindcheck_core::model::{AssessmentSession, AudioClip, QuestionId, StageId};
use mindcheck_core::time::fixed_now;
use services::api::{CognitiveRisk, GameRecord, RiskScore, SubmitResponse};
use services::{DashboardData, DashboardStats};

use super::{
    ViewError, ViewState, render_completion, render_dashboard, render_document, render_games,
    render_progress, render_results,
};
use crate::vm::{
    AssessmentProgressVm, CompletionVm, DashboardVm, game_catalogue, map_result_rows,
};

fn record(game_type: &str, score: f64, hours_ago: i64) -> GameRecord {
    GameRecord {
        game_type: game_type.to_string(),
        score,
        accuracy: Some(80.0),
        duration: Some(60),
        timestamp: fixed_now() - Duration::hours(hours_ago),
    }
}

#[test]
fn dashboard_view_smoke_renders_stats_and_recent_rows() {
    let data = DashboardData {
        stats: DashboardStats {
            total_games: 2,
            average_score: 63.0,
            highest_score: 120.0,
            last_played: Some(fixed_now() - Duration::hours(2)),
        },
        recent: vec![record("stroop", 120.0, 2), record("memory", 6.0, 5)],
        risk: Some(RiskScore {
            score: Some(18.0),
            category: Some("low".into()),
            probability: Some(0.18),
        }),
    };
    let vm = DashboardVm::from_data(&data, fixed_now());

    let html = render_dashboard(ViewState::Ready(vm));
    for expected in [
        "Total Games",
        "63.0",
        "120.0",
        "2 hours ago",
        "Stroop Color Test",
        "Memory Sequence",
        "risk-low",
        "Low Risk",
        "18.0%",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

#[test]
fn dashboard_view_smoke_renders_empty_state() {
    let data = DashboardData {
        stats: DashboardStats::default(),
        recent: Vec::new(),
        risk: None,
    };
    let html = render_dashboard(ViewState::Ready(DashboardVm::from_data(&data, fixed_now())));
    assert!(html.contains("No games played yet"), "missing empty text in {html}");
    assert!(html.contains("Never"), "missing last played in {html}");
    assert!(!html.contains("Cognitive Risk Assessment"));
}

#[test]
fn dashboard_view_smoke_renders_error_and_loading() {
    let html = render_dashboard(ViewState::Error(ViewError::Backend("status 502".into())));
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("status 502"), "missing detail in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");

    let html = render_dashboard(ViewState::Loading);
    assert!(html.contains("Loading..."), "missing loading in {html}");
}

#[test]
fn results_table_smoke_renders_rows() {
    let mut no_accuracy = record("matching", 250.0, 1);
    no_accuracy.accuracy = None;
    let html = render_results(map_result_rows(&[no_accuracy, record("custom", 3.0, 1)]));
    assert!(html.contains("Object-Purpose Matching"), "missing title in {html}");
    assert!(html.contains("250.0"), "missing score in {html}");
    assert!(html.contains("custom"), "missing raw type in {html}");
    assert!(html.contains("80%"), "missing accuracy in {html}");
}

#[test]
fn progress_view_smoke_tracks_stage() {
    let mut session = AssessmentSession::new();
    session.next();
    let html = render_progress(AssessmentProgressVm::from(&session));
    assert!(html.contains("Stroop Test"), "missing stage title in {html}");
    assert!(html.contains("Step 2 of 4"), "missing step label in {html}");
    assert!(html.contains("width: 50%"), "missing bar width in {html}");
    assert!(html.contains("Back"), "missing back button in {html}");
    assert!(html.contains("step-done"), "missing done marker in {html}");
}

#[test]
fn completion_view_smoke_renders_response() {
    let mut session = AssessmentSession::new();
    session.set_score(StageId::Memory, Some(5));
    session.set_score(StageId::Stroop, Some(120));
    session.set_score(StageId::ImageRecall, Some(8));
    session.set_audio_recording(QuestionId::Q1, Some(AudioClip::webm(vec![1, 2])));
    session.begin_submission();
    session.mark_succeeded();
    let response = SubmitResponse {
        summary_report: Some("Scores are within the expected range.".into()),
        cognitive_risk: Some(CognitiveRisk {
            probability: Some(0.62),
            category: Some("high".into()),
            disclaimer: Some("This is not a medical diagnosis.".into()),
        }),
        pdf_filename: Some("doctor_report_1.pdf".into()),
        ..SubmitResponse::default()
    };

    let html = render_completion(CompletionVm::new(&session, Some(&response)));
    for expected in [
        "Assessment Complete!",
        "Memory Game: 5",
        "Stroop Test: 120",
        "Image Recall: 8",
        "1 of 4 questions recorded",
        "Scores are within the expected range.",
        "risk-other",
        "62.0%",
        "This is not a medical diagnosis.",
        "doctor_report_1.pdf",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

#[test]
fn completion_view_smoke_renders_failure() {
    let mut session = AssessmentSession::new();
    session.begin_submission();
    session.mark_failed("backend returned 500");
    let html = render_completion(CompletionVm::new(&session, None));
    assert!(html.contains("Submission Failed"), "missing headline in {html}");
    assert!(html.contains("backend returned 500"), "missing message in {html}");
    assert!(html.contains("Memory Game: -"), "missing blank score in {html}");
}

#[test]
fn games_view_smoke_lists_catalogue() {
    let html = render_games(game_catalogue());
    assert!(html.contains("Cognitive Games"));
    assert!(html.contains("play image-recall"), "missing slug in {html}");
    assert!(html.contains("Match objects with their correct purposes"));
}

#[test]
fn document_wraps_fragment() {
    let page = render_document("Dashboard", "<p>hi</p>");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Dashboard</title>"));
    assert!(page.contains("<body><p>hi</p></body>"));
}
