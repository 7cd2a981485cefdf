use std::sync::Arc;

use mindcheck_core::model::GameKind;
use services::{Access, AppConfig, BackendClient, FileAudioSource, Recorder, guard};
use ui::render_games;
use ui::vm::game_catalogue;

mod args;
mod assess;
mod commands;
mod console;
mod logging;
mod play;

use args::{Args, Command, print_usage};
use commands::CommandError;
use console::Console;
use play::RunResult;

fn resolve_config(args: &Args) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(url) = &args.backend_url {
        config = config.with_backend_url(url.clone());
    }
    if let Some(email) = &args.email {
        config = config.with_email(email.clone());
    }
    config
}

fn recorder_for(args: &Args) -> Option<Recorder> {
    args.audio
        .as_ref()
        .map(|path| Recorder::new(Arc::new(FileAudioSource::new(path.clone()))))
}

async fn play_game(kind: GameKind, client: &BackendClient, args: &Args) -> RunResult<()> {
    let mut console = Console::new();
    let result = match kind {
        GameKind::Memory => play::run_memory(&mut console).await?,
        GameKind::CardMemory => play::run_card_memory(&mut console, args.difficulty).await?,
        GameKind::Stroop => play::run_stroop(&mut console).await?,
        GameKind::ImageRecall => play::run_image_recall(&mut console).await?,
        GameKind::Matching => play::run_matching(&mut console).await?,
        GameKind::Speech => {
            let mut recorder = recorder_for(args);
            let outcome = play::run_speech(&mut console, recorder.as_mut()).await?;
            if client.session().is_some() {
                commands::publish_answers(client, outcome.answers).await;
            }
            outcome.result
        }
    };

    println!(
        "{}: score {}, accuracy {}%, {}s",
        result.game.title(),
        result.score,
        result.accuracy,
        result.duration_secs
    );
    if client.session().is_some() {
        commands::publish_result(client, &result).await;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let config = resolve_config(&args);
    logging::init_tracing(&config.log_filter)?;

    if args.command.is_protected() {
        if let Access::Redirect { to } = guard(config.session.as_ref()) {
            eprintln!("Please sign in first: set MINDCHECK_USER_EMAIL or pass --email.");
            return Err(CommandError::SignInRequired { to }.into());
        }
    }

    let client = BackendClient::from_config(&config)?;
    tracing::debug!(target: "app", backend = %client.base_url(), command = ?args.command, "command_started");

    match &args.command {
        Command::Assess => {
            let email = config
                .session
                .as_ref()
                .map(|session| session.email.clone())
                .unwrap_or_default();
            if let Some(session) = client.session() {
                println!("Welcome, {}.", session.display_name());
            }
            let mut console = Console::new();
            assess::run_assessment(
                &mut console,
                client,
                &email,
                recorder_for(&args),
                args.out.as_ref(),
            )
            .await
        }
        Command::Play(None) => {
            for card in game_catalogue() {
                println!("{:<14} {:<26} {}", card.slug, card.title, card.description);
            }
            if let Some(out) = &args.out {
                commands::write_page(out, "Games", &render_games(game_catalogue())).await?;
            }
            Ok(())
        }
        Command::Play(Some(kind)) => play_game(*kind, &client, &args).await,
        Command::Health => commands::health(&client).await,
        Command::Check => commands::check(&client).await,
        Command::Results => commands::results(&client, &args).await,
        Command::Score => commands::score(&client).await,
        Command::Report => commands::report(client, &args).await,
        Command::DownloadReport { id } => {
            commands::download_report(client, id, args.out.as_ref()).await
        }
        Command::Dashboard => commands::dashboard(client, args.out.as_ref()).await,
        Command::Sentiment { text } => {
            commands::sentiment(&client, text, args.context.as_deref()).await
        }
        Command::Help => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
