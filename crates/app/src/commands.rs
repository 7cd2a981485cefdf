//! Subcommands that talk to the backend without a game in between.

use std::fmt;
use std::path::{Path, PathBuf};

use mindcheck_core::Clock;
use mindcheck_core::model::GameResult;
use services::api::{DEFAULT_REPORT_TYPE, HealthStatus, ResultFilters, SpeechTask};
use services::dashboard::{filter_records, sort_records};
use services::{BackendClient, DashboardService, ReportService, check_endpoints};
use ui::vm::{DashboardVm, RiskVm, map_result_rows};
use ui::{ViewState, render_dashboard, render_document, render_results};

use crate::args::Args;
use crate::play::{RecordedAnswer, RunResult};

#[derive(Debug)]
pub enum CommandError {
    SignInRequired { to: &'static str },
    Unreachable(String),
    EndpointsFailing(usize),
    SubmissionFailed(String),
    DashboardUnavailable(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::SignInRequired { to } => write!(f, "sign-in required (redirect to {to})"),
            CommandError::Unreachable(reason) => write!(f, "backend unreachable: {reason}"),
            CommandError::EndpointsFailing(count) => write!(f, "{count} endpoint check(s) failed"),
            CommandError::SubmissionFailed(message) => write!(f, "submission failed: {message}"),
            CommandError::DashboardUnavailable(message) => {
                write!(f, "dashboard unavailable: {message}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

pub async fn write_page(path: &Path, title: &str, body: &str) -> RunResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, render_document(title, body)).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub async fn health(client: &BackendClient) -> RunResult<()> {
    match client.health().await {
        HealthStatus::Connected(body) => {
            println!("Connected to {}: {body}", client.base_url());
            Ok(())
        }
        HealthStatus::Unreachable(reason) => Err(CommandError::Unreachable(reason).into()),
    }
}

pub async fn check(client: &BackendClient) -> RunResult<()> {
    println!("Backend: {}", client.base_url());
    let checks = check_endpoints(client).await;
    for check in &checks {
        let mark = if check.ok { "ok  " } else { "FAIL" };
        match &check.detail {
            Some(detail) => println!("  [{mark}] {} ({detail})", check.name),
            None => println!("  [{mark}] {}", check.name),
        }
    }
    let failed = checks.iter().filter(|c| !c.ok).count();
    if failed > 0 {
        return Err(CommandError::EndpointsFailing(failed).into());
    }
    Ok(())
}

pub async fn results(client: &BackendClient, args: &Args) -> RunResult<()> {
    let filters = ResultFilters {
        game_type: args
            .game_filter
            .clone()
            .filter(|game| !game.eq_ignore_ascii_case("all")),
        limit: args.limit,
        period: None,
    };
    let fetched = client.results(&filters).await?;
    let mut records = filter_records(
        &fetched,
        args.search.as_deref(),
        args.game_filter.as_deref(),
    );
    sort_records(&mut records, args.sort);

    let rows = map_result_rows(&records);
    if rows.is_empty() {
        println!("No results found.");
    }
    for row in &rows {
        println!(
            "{:<26} {:>8} {:>6}  {}",
            row.game_label, row.score_str, row.accuracy_str, row.played_at_str
        );
    }
    if let Some(out) = &args.out {
        write_page(out, "Results", &render_results(rows)).await?;
    }
    Ok(())
}

pub async fn score(client: &BackendClient) -> RunResult<()> {
    let risk = RiskVm::from(&client.risk_score().await?);
    println!("{}", risk.label);
    if let Some(score) = &risk.score_str {
        println!("  score: {score}");
    }
    if let Some(probability) = &risk.probability_str {
        println!("  probability: {probability}");
    }
    Ok(())
}

pub async fn report(client: BackendClient, args: &Args) -> RunResult<()> {
    let reports = ReportService::new(client);
    let report_type = args.report_type.as_deref().unwrap_or(DEFAULT_REPORT_TYPE);
    if let Some(dir) = &args.out {
        let path = reports.generate_and_download(report_type, dir).await?;
        println!("Report saved to {}", path.display());
        return Ok(());
    }

    let ticket = reports.generate(report_type).await?;
    println!(
        "Report {} ({})",
        ticket.report_id.as_deref().unwrap_or("without id"),
        ticket.status.as_deref().unwrap_or("requested")
    );
    if let Some(id) = &ticket.report_id {
        println!("Download it with: mindcheck download-report {id}");
    }
    Ok(())
}

pub async fn download_report(client: BackendClient, id: &str, out: Option<&PathBuf>) -> RunResult<()> {
    let dir = out.map_or_else(|| PathBuf::from("."), Clone::clone);
    let path = ReportService::new(client).download(id, &dir).await?;
    println!("Report saved to {}", path.display());
    Ok(())
}

pub async fn dashboard(client: BackendClient, out: Option<&PathBuf>) -> RunResult<()> {
    let now = Clock::default().now();
    let loaded = DashboardService::new(client)
        .load(&ResultFilters::default())
        .await
        .map(|data| DashboardVm::from_data(&data, now));
    let state = ViewState::from(loaded);

    if let ViewState::Ready(vm) = &state {
        println!("Games played:  {}", vm.total_games);
        println!("Average score: {}", vm.average_score_str);
        println!("Highest score: {}", vm.highest_score_str);
        println!("Last played:   {}", vm.last_played_str);
        if let Some(risk) = &vm.risk {
            println!("Risk:          {}", risk.label);
        }
        if !vm.recent.is_empty() {
            println!("Recent activity:");
            for row in &vm.recent {
                println!("  {} {} ({})", row.game_label, row.score_str, row.played_at_str);
            }
        }
    }

    if let Some(out) = out {
        write_page(out, "Dashboard", &render_dashboard(state.clone())).await?;
    }
    match state {
        ViewState::Error(err) => Err(CommandError::DashboardUnavailable(err.message()).into()),
        _ => Ok(()),
    }
}

pub async fn sentiment(client: &BackendClient, text: &str, context: Option<&str>) -> RunResult<()> {
    match client.sentiment_analysis(text, context).await {
        Ok(analysis) => {
            println!("{analysis}");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(target: "app", error = %err, "sentiment_failed");
            Err(err.into())
        }
    }
}

/// Send a standalone game's result. Failures are reported, never fatal.
pub async fn publish_result(client: &BackendClient, result: &GameResult) {
    match client.submit_game_results(result).await {
        Ok(_) => println!("Result saved."),
        Err(err) => {
            tracing::warn!(target: "app", game = %result.game, error = %err, "game_result_not_saved");
            println!("Could not save the result: {err}");
        }
    }
}

pub const SPEECH_TASK_TYPE: &str = "speech-fluency";

pub async fn publish_answers(client: &BackendClient, answers: Vec<RecordedAnswer>) {
    for answer in answers {
        let task = SpeechTask {
            task_type: SPEECH_TASK_TYPE.into(),
            prompt: answer.question.prompt().into(),
            duration_secs: u64::from(answer.duration_secs),
        };
        if let Err(err) = client.upload_speech(answer.clip, &task).await {
            tracing::warn!(
                target: "app",
                question = %answer.question,
                error = %err,
                "speech_upload_failed"
            );
            println!("Could not upload the answer to {}: {err}", answer.question);
        }
    }
}
