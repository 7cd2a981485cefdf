use std::fmt;
use std::path::PathBuf;

use mindcheck_core::games::Difficulty;
use mindcheck_core::model::GameKind;
use services::dashboard::SortBy;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidValue { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidValue { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Assess,
    /// `None` lists the catalogue.
    Play(Option<GameKind>),
    Health,
    Check,
    Results,
    Score,
    Report,
    DownloadReport { id: String },
    Dashboard,
    Sentiment { text: String },
    Help,
}

impl Command {
    /// Commands that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Command::Assess
                | Command::Results
                | Command::Score
                | Command::Report
                | Command::DownloadReport { .. }
                | Command::Dashboard
                | Command::Sentiment { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub backend_url: Option<String>,
    pub email: Option<String>,
    pub audio: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub report_type: Option<String>,
    pub game_filter: Option<String>,
    pub search: Option<String>,
    pub sort: SortBy,
    pub limit: Option<u32>,
    pub difficulty: Difficulty,
    pub context: Option<String>,
}

impl Args {
    fn new(command: Command) -> Self {
        Self {
            command,
            backend_url: None,
            email: None,
            audio: None,
            out: None,
            report_type: None,
            game_filter: None,
            search: None,
            sort: SortBy::default(),
            limit: None,
            difficulty: Difficulty::default(),
            context: None,
        }
    }

    /// Parse everything after the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = args.into_iter().peekable();

        let first = args.peek().cloned();
        let command = match first.as_deref() {
            None => Command::Assess,
            Some("-h" | "--help") => {
                args.next();
                Command::Help
            }
            Some(flag) if flag.starts_with('-') => Command::Assess,
            Some(_) => {
                let name = args.next().unwrap_or_default();
                let positional = next_positional(&mut args);
                match (name.as_str(), positional) {
                    ("assess", None) => Command::Assess,
                    ("play", None) => Command::Play(None),
                    ("play", Some(raw)) => {
                        let kind = raw
                            .parse::<GameKind>()
                            .map_err(|_| ArgsError::InvalidValue { flag: "play", raw })?;
                        Command::Play(Some(kind))
                    }
                    ("download-report", Some(id)) => Command::DownloadReport { id },
                    ("download-report", None) => {
                        return Err(ArgsError::MissingArgument { what: "report id" });
                    }
                    ("sentiment", Some(text)) => Command::Sentiment { text },
                    ("sentiment", None) => {
                        return Err(ArgsError::MissingArgument { what: "text" });
                    }
                    ("health", None) => Command::Health,
                    ("check", None) => Command::Check,
                    ("results", None) => Command::Results,
                    ("score", None) => Command::Score,
                    ("report", None) => Command::Report,
                    ("dashboard", None) => Command::Dashboard,
                    ("help", None) => Command::Help,
                    (
                        "assess" | "health" | "check" | "results" | "score" | "report"
                        | "dashboard" | "help",
                        Some(extra),
                    ) => return Err(ArgsError::UnknownArg(extra)),
                    _ => return Err(ArgsError::UnknownCommand(name.clone())),
                }
            }
        };

        let mut parsed = Self::new(command);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend-url" => parsed.backend_url = Some(require_value(&mut args, "--backend-url")?),
                "--email" => parsed.email = Some(require_value(&mut args, "--email")?),
                "--audio" => parsed.audio = Some(require_value(&mut args, "--audio")?.into()),
                "--out" => parsed.out = Some(require_value(&mut args, "--out")?.into()),
                "--type" => parsed.report_type = Some(require_value(&mut args, "--type")?),
                "--game" => parsed.game_filter = Some(require_value(&mut args, "--game")?),
                "--search" => parsed.search = Some(require_value(&mut args, "--search")?),
                "--sort" => {
                    let value = require_value(&mut args, "--sort")?;
                    parsed.sort = value.parse().map_err(|_| ArgsError::InvalidValue {
                        flag: "--sort",
                        raw: value.clone(),
                    })?;
                }
                "--limit" => {
                    let value = require_value(&mut args, "--limit")?;
                    let limit = value.parse().map_err(|_| ArgsError::InvalidValue {
                        flag: "--limit",
                        raw: value.clone(),
                    })?;
                    parsed.limit = Some(limit);
                }
                "--difficulty" => {
                    let value = require_value(&mut args, "--difficulty")?;
                    parsed.difficulty = value.parse().map_err(|_| ArgsError::InvalidValue {
                        flag: "--difficulty",
                        raw: value.clone(),
                    })?;
                }
                "--context" => parsed.context = Some(require_value(&mut args, "--context")?),
                "--help" | "-h" => parsed.command = Command::Help,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

/// Take the next argument if it is not a flag.
fn next_positional(args: &mut std::iter::Peekable<impl Iterator<Item = String>>) -> Option<String> {
    let is_value = args.peek().is_some_and(|arg| !arg.starts_with('-'));
    if is_value { args.next() } else { None }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ArgsError::MissingValue { flag })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  mindcheck [assess] [--audio <file>] [--out <file>]");
    eprintln!("  mindcheck play [memory|card-memory|stroop|image-recall|matching|speech] [--audio <file>]");
    eprintln!("      [--difficulty easy|medium|hard]   card-memory board size");
    eprintln!("  mindcheck health | check");
    eprintln!("  mindcheck results [--game <type>] [--limit <n>] [--search <text>] [--sort date|score|type] [--out <file>]");
    eprintln!("  mindcheck score");
    eprintln!("  mindcheck report [--type <report type>]");
    eprintln!("  mindcheck download-report <id> [--out <dir>]");
    eprintln!("  mindcheck dashboard [--out <file>]");
    eprintln!("  mindcheck sentiment <text> [--context <label>]");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --backend-url <url>   overrides MINDCHECK_BACKEND_URL");
    eprintln!("  --email <address>     overrides MINDCHECK_USER_EMAIL");
    eprintln!();
    eprintln!("Environment (a .env file is read first):");
    eprintln!("  MINDCHECK_BACKEND_URL, MINDCHECK_ACCESS_TOKEN, MINDCHECK_USER_EMAIL,");
    eprintln!("  MINDCHECK_USER_ID, MINDCHECK_USER_NAME, MINDCHECK_LOG");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_arguments_runs_the_assessment() {
        assert_eq!(parse(&[]).expect("parse").command, Command::Assess);
        let args = parse(&["--email", "a@b.com"]).expect("parse");
        assert_eq!(args.command, Command::Assess);
        assert_eq!(args.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn play_takes_an_optional_game() {
        assert_eq!(
            parse(&["play", "image-recall"]).expect("parse").command,
            Command::Play(Some(GameKind::ImageRecall))
        );
        assert_eq!(parse(&["play"]).expect("parse").command, Command::Play(None));
        assert!(matches!(
            parse(&["play", "chess"]),
            Err(ArgsError::InvalidValue { flag: "play", .. })
        ));
    }

    #[test]
    fn download_report_needs_an_id() {
        let args = parse(&["download-report", "r-9", "--out", "reports"]).expect("parse");
        assert_eq!(args.command, Command::DownloadReport { id: "r-9".into() });
        assert_eq!(args.out, Some(PathBuf::from("reports")));
        assert_eq!(
            parse(&["download-report"]),
            Err(ArgsError::MissingArgument { what: "report id" })
        );
    }

    #[test]
    fn results_filters_parse() {
        let args = parse(&["results", "--game", "stroop", "--limit", "5", "--sort", "score"])
            .expect("parse");
        assert_eq!(args.game_filter.as_deref(), Some("stroop"));
        assert_eq!(args.limit, Some(5));
        assert_eq!(args.sort, SortBy::Score);
        assert!(matches!(
            parse(&["results", "--limit", "many"]),
            Err(ArgsError::InvalidValue { flag: "--limit", .. })
        ));
    }

    #[test]
    fn card_memory_difficulty() {
        let args = parse(&["play", "card-memory", "--difficulty", "Hard"]).expect("parse");
        assert_eq!(args.command, Command::Play(Some(GameKind::CardMemory)));
        assert_eq!(args.difficulty, Difficulty::Hard);
        assert_eq!(parse(&["play", "cards"]).expect("parse").difficulty, Difficulty::Easy);
        assert!(matches!(
            parse(&["play", "cards", "--difficulty", "insane"]),
            Err(ArgsError::InvalidValue { flag: "--difficulty", .. })
        ));
    }

    #[test]
    fn sentiment_takes_text_and_context() {
        let args = parse(&["sentiment", "I feel rested", "--context", "diary"]).expect("parse");
        assert_eq!(
            args.command,
            Command::Sentiment {
                text: "I feel rested".into()
            }
        );
        assert_eq!(args.context.as_deref(), Some("diary"));
        assert!(args.command.is_protected());
        assert_eq!(
            parse(&["sentiment", "--context", "diary"]),
            Err(ArgsError::MissingArgument { what: "text" })
        );
    }

    #[test]
    fn help_anywhere() {
        assert_eq!(parse(&["--help"]).expect("parse").command, Command::Help);
        assert_eq!(parse(&["results", "-h"]).expect("parse").command, Command::Help);
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            parse(&["dance"]),
            Err(ArgsError::UnknownCommand("dance".into()))
        );
        assert_eq!(
            parse(&["health", "--verbose"]),
            Err(ArgsError::UnknownArg("--verbose".into()))
        );
        assert_eq!(
            parse(&["report", "--type"]),
            Err(ArgsError::MissingValue { flag: "--type" })
        );
    }

    #[test]
    fn protected_commands() {
        assert!(Command::Dashboard.is_protected());
        assert!(Command::Assess.is_protected());
        assert!(!Command::Health.is_protected());
        assert!(!Command::Play(None).is_protected());
    }
}
