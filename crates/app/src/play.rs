//! Terminal front ends for the mini-games.

use std::collections::BTreeSet;
use std::error::Error;
use std::time::Duration;

use mindcheck_core::games::image_recall::STUDY_SECONDS;
use mindcheck_core::games::memory::FLASH_INTERVAL_MS;
use mindcheck_core::games::stroop::STROOP_SECONDS;
use mindcheck_core::games::{
    CardMemoryGame, Difficulty, FlipOutcome, GameError, ImageRecallGame, InkColor, MatchOutcome,
    MatchingGame, MemoryGame, Pad, PressOutcome, SpeechTest, StroopGame, StroopTrial,
};
use mindcheck_core::model::{AudioClip, GameKind, GameResult, QuestionId};
use mindcheck_core::phase::Phase;
use mindcheck_core::{CountdownTick, format_clock};
use services::{CountdownEvent, Recorder, RecorderError};
use tokio::time::Instant;

use crate::console::{Console, Timer, next_tick, paint};

pub type RunResult<T> = Result<T, Box<dyn Error>>;

/// Longest single speech answer before recording stops on its own.
pub const MAX_ANSWER_SECS: u32 = 120;

/// The card game clock stops after an hour.
pub const CARD_CLOCK_SECS: u32 = 3600;

fn elapsed_secs(started: Instant) -> u64 {
    started.elapsed().as_secs()
}

fn banner(kind: GameKind) {
    println!();
    println!("== {} ==", kind.title());
    println!("{}", kind.description());
}

/// Errors a player can cause by mistyping; they are shown and play continues.
fn recoverable(err: &GameError) -> bool {
    matches!(
        err,
        GameError::UnknownItem(_)
            | GameError::AlreadyMatched(_)
            | GameError::AlreadyFaceUp(_)
            | GameError::NothingSelected
    )
}

//
// ─── MEMORY ────────────────────────────────────────────────────────────────────
//

fn parse_pads(line: &str) -> Option<Vec<Pad>> {
    let mut pads = Vec::new();
    for token in line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        if token.chars().all(|c| c.is_ascii_digit()) {
            for digit in token.chars() {
                let number = digit.to_digit(10).and_then(|d| u8::try_from(d).ok())?;
                pads.push(Pad::from_number(number)?);
            }
        } else {
            let pad = Pad::ALL
                .into_iter()
                .find(|pad| pad.name().eq_ignore_ascii_case(token))?;
            pads.push(pad);
        }
    }
    (!pads.is_empty()).then_some(pads)
}

pub async fn run_memory(console: &mut Console) -> RunResult<GameResult> {
    banner(GameKind::Memory);
    println!("Watch the colours, then repeat them. Pads: 1 Red, 2 Blue, 3 Green, 4 Yellow.");
    console.prompt("Press Enter to start.").await?;

    let mut game = MemoryGame::new();
    let started = Instant::now();
    game.start()?;

    'levels: loop {
        println!("Level {}:", game.level());
        for pad in game.sequence() {
            println!("  {} ({})", pad.name(), pad.number());
            tokio::time::sleep(Duration::from_millis(FLASH_INTERVAL_MS)).await;
        }
        println!("{}", "\n".repeat(20));
        game.sequence_shown()?;

        loop {
            let needed = game.sequence().len() - game.entered().len();
            let line = console
                .prompt(&format!("Enter {needed} more pad(s): "))
                .await?;
            let Some(pads) = parse_pads(&line) else {
                println!("Use 1-4 or red/blue/green/yellow.");
                continue;
            };
            for pad in pads {
                match game.press(pad)? {
                    PressOutcome::Correct { .. } => {}
                    PressOutcome::LevelCleared { score, next_level } => {
                        println!("Correct! Score {score}. On to level {next_level}.");
                        continue 'levels;
                    }
                    PressOutcome::Completed { score } => {
                        println!("Every level cleared. Final score {score}.");
                        break 'levels;
                    }
                    PressOutcome::GameOver { score } => {
                        println!("Wrong colour. Final score {score}.");
                        break 'levels;
                    }
                }
            }
        }
    }

    Ok(game.result(elapsed_secs(started)))
}

//
// ─── CARD PAIRS ────────────────────────────────────────────────────────────────
//

fn show_cards(game: &CardMemoryGame, reveal_all: bool) {
    let cells: Vec<String> = game
        .cards()
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let visible = reveal_all || game.is_matched(i) || game.face_up() == Some(i);
            let face = if visible { *symbol } else { "??" };
            format!("{:>2} {face}", i + 1)
        })
        .collect();
    for row in cells.chunks(game.difficulty().columns()) {
        println!("  {}", row.join("   "));
    }
}

fn parse_cards(line: &str) -> Option<Vec<usize>> {
    let cards: Option<Vec<usize>> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<usize>().ok()?.checked_sub(1))
        .collect();
    cards.filter(|cards| !cards.is_empty())
}

pub async fn run_card_memory(
    console: &mut Console,
    difficulty: Difficulty,
) -> RunResult<GameResult> {
    banner(GameKind::CardMemory);
    println!(
        "{} pairs. The cards are shown for {:.1}s, then turned over.",
        difficulty.pairs(),
        Duration::from_millis(difficulty.preview_ms()).as_secs_f64()
    );
    println!("Turn cards by number, one or two per line. Type p to pause.");
    console.prompt("Press Enter to start.").await?;

    let mut game = CardMemoryGame::new(difficulty);
    game.start()?;
    show_cards(&game, true);
    tokio::time::sleep(Duration::from_millis(difficulty.preview_ms())).await;
    println!("{}", "\n".repeat(20));
    game.end_preview()?;
    show_cards(&game, false);
    let mut timer = Some(Timer::start(CARD_CLOCK_SECS));

    while game.phase() != Phase::Completed {
        tokio::select! {
            Some(event) = next_tick(&mut timer) => match event {
                CountdownEvent::Tick(_) => {
                    game.tick()?;
                }
                CountdownEvent::Elapsed => timer = None,
            },
            line = console.read_line() => {
                let line = line?;
                if line.eq_ignore_ascii_case("p") {
                    if game.toggle_pause()? == Phase::Paused {
                        timer = None;
                        println!("Paused. Type p to resume.");
                    } else {
                        timer = Some(Timer::start(CARD_CLOCK_SECS));
                        show_cards(&game, false);
                    }
                    continue;
                }
                if game.phase() == Phase::Paused {
                    println!("Paused. Type p to resume.");
                    continue;
                }
                let Some(cards) = parse_cards(&line) else {
                    println!("Type card numbers between 1 and {}.", game.cards().len());
                    continue;
                };
                for index in cards {
                    match game.flip(index) {
                        Ok(FlipOutcome::Revealed { symbol }) => {
                            println!("Card {}: {symbol}", index + 1);
                        }
                        Ok(FlipOutcome::Matched { symbol, pairs_left, completed }) => {
                            println!("Match! {symbol} {symbol}. {pairs_left} pair(s) left.");
                            if completed {
                                break;
                            }
                            show_cards(&game, false);
                        }
                        Ok(FlipOutcome::Mismatch { first, second }) => {
                            println!("{first} and {second} do not match.");
                            show_cards(&game, false);
                        }
                        Err(err) if recoverable(&err) => {
                            println!("{err}");
                            break;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }
    }
    drop(timer);

    println!(
        "Board cleared in {} moves and {}. Score {}.",
        game.moves(),
        format_clock(game.elapsed_secs()),
        game.score()
    );
    Ok(game.result())
}

//
// ─── STROOP ────────────────────────────────────────────────────────────────────
//

fn parse_ink(input: &str) -> Option<InkColor> {
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).and_then(|i| InkColor::ALL.get(i).copied());
    }
    InkColor::from_name(input)
}

fn show_trial(trial: StroopTrial, time_left: u32) {
    let word = trial.word.name().to_ascii_uppercase();
    println!(
        "[{}] {}",
        format_clock(u64::from(time_left)),
        paint(&word, trial.ink.hex())
    );
}

pub async fn run_stroop(console: &mut Console) -> RunResult<GameResult> {
    banner(GameKind::Stroop);
    println!("Name the INK colour, not the word. Answer with a name or number:");
    for (i, ink) in InkColor::ALL.iter().enumerate() {
        println!("  {} {}", i + 1, paint(ink.name(), ink.hex()));
    }
    println!("You have {STROOP_SECONDS} seconds. Type p to pause or resume.");
    console.prompt("Press Enter to start.").await?;

    let mut game = StroopGame::new();
    let trial = game.start()?;
    let mut timer = Some(Timer::start(game.time_left()));
    let mut shown = Instant::now();
    show_trial(trial, game.time_left());

    loop {
        tokio::select! {
            Some(_) = next_tick(&mut timer) => {
                if matches!(game.tick()?, CountdownTick::Elapsed | CountdownTick::Finished) {
                    println!("Time is up.");
                    break;
                }
            }
            line = console.read_line() => {
                let line = line?;
                if line.eq_ignore_ascii_case("p") {
                    if game.toggle_pause()? == Phase::Paused {
                        timer = None;
                        println!("Paused. Type p to resume.");
                    } else {
                        timer = Some(Timer::start(game.time_left()));
                        shown = Instant::now();
                        if let Some(trial) = game.current_trial() {
                            show_trial(trial, game.time_left());
                        }
                    }
                    continue;
                }
                if game.phase() == Phase::Paused {
                    println!("Paused. Type p to resume.");
                    continue;
                }
                let Some(ink) = parse_ink(&line) else {
                    println!("Unknown colour '{line}'.");
                    continue;
                };
                let reaction_ms = u64::try_from(shown.elapsed().as_millis()).unwrap_or(u64::MAX);
                let answer = game.answer(ink, reaction_ms)?;
                if answer.correct {
                    println!("Correct, +{}", answer.points);
                } else {
                    println!("Wrong, the ink was {}", answer.trial.ink.name());
                }
                if let Some(trial) = game.current_trial() {
                    shown = Instant::now();
                    show_trial(trial, game.time_left());
                }
            }
        }
    }

    println!(
        "Score {} | {} of {} correct | accuracy {}% | average {} ms",
        game.score(),
        game.correct_answers(),
        game.total_questions(),
        game.accuracy(),
        game.average_reaction_ms()
    );
    Ok(game.result())
}

//
// ─── IMAGE RECALL ──────────────────────────────────────────────────────────────
//

fn parse_numbers(line: &str) -> Option<BTreeSet<usize>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<usize>().ok().and_then(|n| n.checked_sub(1)))
        .collect()
}

pub async fn run_image_recall(console: &mut Console) -> RunResult<GameResult> {
    banner(GameKind::ImageRecall);
    println!("Memorise the items for {STUDY_SECONDS} seconds, then pick them out of a larger set.");
    console.prompt("Press Enter to start.").await?;

    let mut game = ImageRecallGame::new();
    let started = Instant::now();
    game.start()?;

    loop {
        println!("Level {}: remember these items (Enter when ready)", game.level());
        for item in game.study_items() {
            println!("  {} {}", item.symbol, item.label);
        }

        let mut timer = Some(Timer::start(game.study_time_left()));
        while game.phase() == Phase::Study {
            tokio::select! {
                Some(_) = next_tick(&mut timer) => {
                    game.tick()?;
                }
                line = console.read_line() => {
                    line?;
                    game.end_study()?;
                }
            }
        }
        drop(timer);
        println!("{}", "\n".repeat(20));

        println!("Which of these did you see?");
        for (i, item) in game.choices().iter().enumerate() {
            println!("  {:>2} {} {}", i + 1, item.symbol, item.label);
        }
        loop {
            let line = console.prompt("Numbers of the items you saw: ").await?;
            let Some(picks) = parse_numbers(&line) else {
                println!("Enter item numbers separated by spaces.");
                continue;
            };
            let mut rejected = false;
            for index in picks {
                match game.toggle(index) {
                    Ok(_) => {}
                    Err(err) if recoverable(&err) => {
                        println!("{err}");
                        rejected = true;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            if !rejected || game.selected_count() > 0 {
                break;
            }
        }

        let outcome = game.submit_recall()?;
        println!(
            "{} correct, {} wrong: +{} (total {})",
            outcome.correct, outcome.incorrect, outcome.level_score, outcome.total
        );
        if outcome.completed {
            break;
        }
    }

    Ok(game.result(elapsed_secs(started)))
}

//
// ─── MATCHING ──────────────────────────────────────────────────────────────────
//

fn show_board(game: &MatchingGame) {
    let pairs = game.pairs();
    println!("Level {}:", game.level());
    println!("  Objects:");
    for (i, pair) in pairs.iter().enumerate() {
        let done = if game.is_matched(i) { " (matched)" } else { "" };
        println!("    {} {} {}{done}", i + 1, pair.object, pair.object_name);
    }
    println!("  Purposes:");
    for (slot, index) in game.purpose_order().iter().enumerate() {
        if let Some(pair) = pairs.get(*index) {
            println!("    {} {} {}", slot + 1, pair.purpose, pair.purpose_name);
        }
    }
}

pub async fn run_matching(console: &mut Console) -> RunResult<GameResult> {
    banner(GameKind::Matching);
    println!("Match each object with its purpose: type '<object> <purpose>', p to pause.");
    console.prompt("Press Enter to start.").await?;

    let mut game = MatchingGame::new();
    let started = Instant::now();
    game.start()?;
    show_board(&game);

    while game.phase() != Phase::Completed {
        let line = console.prompt("> ").await?;
        if line.eq_ignore_ascii_case("p") {
            match game.toggle_pause()? {
                Phase::Paused => println!("Paused. Type p to resume."),
                _ => show_board(&game),
            }
            continue;
        }
        if game.phase() == Phase::Paused {
            println!("Paused. Type p to resume.");
            continue;
        }

        let numbers: Vec<usize> = line
            .split_whitespace()
            .filter_map(|t| t.parse::<usize>().ok()?.checked_sub(1))
            .collect();
        let &[object, slot] = numbers.as_slice() else {
            println!("Type an object number and a purpose number, e.g. '1 3'.");
            continue;
        };

        let outcome = match game
            .select_object(object)
            .and_then(|()| game.select_purpose(slot))
        {
            Ok(outcome) => outcome,
            Err(err) if recoverable(&err) => {
                println!("{err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        match outcome {
            MatchOutcome::Correct {
                points,
                description,
                level_complete,
                game_complete,
            } => {
                println!("Correct, +{points}. {description}");
                if game_complete {
                    println!("All levels complete.");
                } else if level_complete {
                    println!("Level complete!");
                    show_board(&game);
                }
            }
            MatchOutcome::Incorrect { object_name } => {
                println!("That is not what the {object_name} is for.");
            }
        }
    }

    println!(
        "Score {} | accuracy {}% | {} wrong attempts",
        game.score(),
        game.accuracy(),
        game.incorrect_attempts()
    );
    Ok(game.result(elapsed_secs(started)))
}

//
// ─── SPEECH ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct RecordedAnswer {
    pub question: QuestionId,
    pub clip: AudioClip,
    pub duration_secs: u32,
}

#[derive(Debug, Clone)]
pub struct SpeechOutcome {
    pub result: GameResult,
    pub answers: Vec<RecordedAnswer>,
}

async fn record_answer(
    console: &mut Console,
    recorder: &mut Recorder,
    test: &mut SpeechTest,
) -> RunResult<u32> {
    recorder.start().await?;
    test.begin_recording()?;
    println!("Recording... press Enter to stop (limit {MAX_ANSWER_SECS}s).");

    let mut timer = Some(Timer::start(MAX_ANSWER_SECS));
    loop {
        tokio::select! {
            Some(event) = next_tick(&mut timer) => {
                let secs = test.tick()?;
                if event == CountdownEvent::Elapsed {
                    println!("Time limit reached.");
                    break;
                }
                if secs % 10 == 0 {
                    println!("  {}", format_clock(u64::from(secs)));
                }
            }
            line = console.read_line() => {
                line?;
                break;
            }
        }
    }
    drop(timer);

    let secs = test.recording_secs();
    let clip = recorder.stop().await?;
    test.push_clip(clip)?;
    let (question, clip) = test.stop_recording()?;
    println!("Saved {} bytes for {question}.", clip.len());
    Ok(secs)
}

/// Without a recorder the test cannot run; the permission message is shown instead.
pub async fn run_speech(
    console: &mut Console,
    recorder: Option<&mut Recorder>,
) -> RunResult<SpeechOutcome> {
    banner(GameKind::Speech);
    let started = Instant::now();
    let mut test = SpeechTest::new();

    let recorder = match recorder {
        Some(recorder) => match recorder.request_permission().await {
            Ok(()) => {
                test.grant();
                Some(recorder)
            }
            Err(RecorderError::PermissionDenied) => {
                test.deny();
                None
            }
            Err(err) => return Err(err.into()),
        },
        None => {
            test.deny();
            None
        }
    };
    let Some(recorder) = recorder else {
        if let Some(message) = test.permission_error() {
            println!("{message}");
        }
        return Ok(SpeechOutcome {
            result: test.result(elapsed_secs(started)),
            answers: Vec::new(),
        });
    };

    test.start()?;
    let mut durations = [0u32; QuestionId::ALL.len()];
    loop {
        let question = test.question();
        let status = if test.recording(question).is_some() { "recorded" } else { "not recorded" };
        println!();
        println!(
            "Question {} of {} ({status}): {}",
            question.index() + 1,
            QuestionId::ALL.len(),
            question.prompt()
        );
        let command = console
            .prompt("[r]ecord  [d]elete  [n]ext  [b]ack  [f]inish: ")
            .await?;
        match command.to_ascii_lowercase().as_str() {
            "r" => {
                if test.recording(question).is_some()
                    && !console.confirm("Replace the existing answer?").await?
                {
                    continue;
                }
                durations[question.index()] = record_answer(console, recorder, &mut test).await?;
            }
            "d" => {
                if test.delete_recording()?.is_some() {
                    durations[question.index()] = 0;
                    println!("Answer deleted.");
                }
            }
            "n" | "" => {
                if test.is_last_question() {
                    if console.confirm("That was the last question. Finish?").await? {
                        break;
                    }
                } else {
                    test.next_question()?;
                }
            }
            "b" => {
                test.prev_question()?;
            }
            "f" => break,
            other => println!("Unknown command '{other}'."),
        }
    }
    test.finish()?;

    let answers = QuestionId::ALL
        .into_iter()
        .filter_map(|question| {
            test.recording(question).map(|clip| RecordedAnswer {
                question,
                clip: clip.clone(),
                duration_secs: durations[question.index()],
            })
        })
        .collect();
    println!("{} of {} questions answered.", test.answered(), QuestionId::ALL.len());
    Ok(SpeechOutcome {
        result: test.result(elapsed_secs(started)),
        answers,
    })
}
