//! The four-stage assessment in the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use mindcheck_core::{Clock, format_clock};
use mindcheck_core::model::{QuestionId, StageId, SubmissionState, parse_score};
use services::{Advance, AssessmentFlow, BackendClient, FlowError, Recorder};
use ui::render_completion;
use ui::vm::{AssessmentProgressVm, CompletionStatus, CompletionVm};

use crate::commands::{CommandError, write_page};
use crate::console::Console;
use crate::play::{RunResult, run_image_recall, run_memory, run_speech, run_stroop};

/// The address results go to. Checked before stage one so a finished
/// assessment is never thrown away for want of it.
fn submission_email(email: &str) -> Result<String, CommandError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CommandError::SignInRequired {
            to: services::auth::SIGN_IN_PATH,
        });
    }
    Ok(email.to_string())
}

/// A score typed in by hand. The speech stage has recordings, not a score.
fn manual_score(stage: StageId, raw: &str) -> Option<i64> {
    match stage {
        StageId::Speech => None,
        StageId::Memory | StageId::Stroop | StageId::ImageRecall => Some(parse_score(raw)),
    }
}

fn print_progress(vm: &AssessmentProgressVm) {
    let steps: Vec<String> = vm
        .steps
        .iter()
        .map(|step| {
            let mark = if step.current {
                '>'
            } else if step.done {
                'x'
            } else {
                ' '
            };
            format!("[{mark}] {}", step.title)
        })
        .collect();
    println!();
    println!("{}  ({}, {}%)", vm.stage_title, vm.step_label, vm.percent);
    println!("{}", steps.join("  "));
}

fn print_completion(vm: &CompletionVm) {
    println!();
    println!("== {} ==", vm.headline());
    if let CompletionStatus::Failed(message) = &vm.status {
        println!("{message}");
    }
    if let Some(risk) = &vm.risk {
        match &risk.probability_str {
            Some(probability) => println!("{} ({probability})", risk.label),
            None => println!("{}", risk.label),
        }
        if let Some(disclaimer) = &risk.disclaimer {
            println!("{disclaimer}");
        }
    }
    for line in &vm.scores {
        println!("  {}: {}", line.label, line.value);
    }
    println!("  {}", vm.recordings_label);
    if let Some(summary) = &vm.summary_report {
        println!();
        println!("{summary}");
    }
    if let Some(notice) = &vm.partial_notice {
        println!("{notice}");
    }
    if let Some(file) = &vm.pdf_filename {
        println!("Report: {file}");
    }
}

async fn run_stage(
    flow: &mut AssessmentFlow,
    console: &mut Console,
    recorder: Option<&mut Recorder>,
) -> RunResult<()> {
    let stage = flow.current_stage();
    match stage {
        StageId::Memory => {
            let result = run_memory(console).await?;
            flow.record_score(stage, result.score);
        }
        StageId::Stroop => {
            let result = run_stroop(console).await?;
            flow.record_score(stage, result.score);
        }
        StageId::ImageRecall => {
            let result = run_image_recall(console).await?;
            flow.record_score(stage, result.score);
        }
        StageId::Speech => {
            let outcome = run_speech(console, recorder).await?;
            for question in QuestionId::ALL {
                flow.record_recording(question, None);
            }
            for answer in outcome.answers {
                flow.record_recording(answer.question, Some(answer.clip));
            }
        }
    }
    Ok(())
}

pub async fn run_assessment(
    console: &mut Console,
    client: BackendClient,
    email: &str,
    mut recorder: Option<Recorder>,
    out: Option<&PathBuf>,
) -> RunResult<()> {
    let email = submission_email(email)?;
    let mut flow = AssessmentFlow::new(Arc::new(client));
    let clock = Clock::default();
    let started = clock.now();

    loop {
        let progress = AssessmentProgressVm::from(flow.session());
        print_progress(&progress);
        run_stage(&mut flow, console, recorder.as_mut()).await?;

        let choice = console
            .prompt(&format!(
                "[Enter] {}  [b] back  [r] redo  [s] type a score: ",
                progress.next_label
            ))
            .await?;
        match choice.to_ascii_lowercase().as_str() {
            "s" => {
                let stage = flow.current_stage();
                let raw = console.prompt(&format!("Score for {stage}: ")).await?;
                match manual_score(stage, &raw) {
                    Some(score) => {
                        flow.record_score(stage, score);
                        println!("Recorded {score}.");
                    }
                    None => println!("This stage has no score to type."),
                }
            }
            "b" => {
                if !flow.back() {
                    println!("Already at the first stage.");
                }
            }
            "r" => {}
            _ => {
                if flow.advance() == Advance::ReadyToSubmit {
                    break;
                }
            }
        }
    }

    loop {
        println!("Submitting...");
        match flow.submit(&email).await {
            Ok(_) => break,
            Err(FlowError::Api(err)) => {
                println!("Submission failed: {err}");
                if err.is_retryable() {
                    println!("The backend may be temporarily unavailable.");
                }
                if !console.confirm("Submit again?").await? {
                    break;
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    let elapsed_secs = clock.seconds_since(started);
    tracing::info!(target: "app", elapsed_secs, "assessment_finished");
    println!("Assessment took {}.", format_clock(elapsed_secs));

    let completion = CompletionVm::new(flow.session(), flow.last_response());
    print_completion(&completion);
    if let Some(out) = out {
        write_page(out, "Assessment", &render_completion(completion)).await?;
    }

    if flow.session().submission_state() == SubmissionState::Failed {
        let message = flow.session().error_message().unwrap_or("unknown error");
        return Err(CommandError::SubmissionFailed(message.to_string()).into());
    }
    Ok(())
}
