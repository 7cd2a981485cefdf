//! The mini-games. Each one pairs a [`PhaseMachine`](crate::phase::PhaseMachine)
//! with its own transition table and scoring rules.

use thiserror::Error;

use crate::phase::PhaseError;

pub mod card_memory;
pub mod image_recall;
pub mod matching;
pub mod memory;
pub mod speech;
pub mod stroop;

pub use card_memory::{CardMemoryGame, Difficulty, FlipOutcome};
pub use image_recall::{ImageRecallGame, RecallItem, RecallOutcome};
pub use matching::{MatchOutcome, MatchPair, MatchingGame};
pub use memory::{MemoryGame, Pad, PressOutcome};
pub use speech::{Permission, SpeechTest};
pub use stroop::{InkColor, StroopAnswer, StroopGame, StroopTrial};

/// Errors from driving a game with an input it cannot take right now.
///
/// A wrong answer is not an error; it is an ordinary outcome of the game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("no item at position {0}")]
    UnknownItem(usize),

    #[error("item {0} was already matched")]
    AlreadyMatched(usize),

    #[error("card {0} is already face up")]
    AlreadyFaceUp(usize),

    #[error("select an object first")]
    NothingSelected,

    #[error("{}", speech::PERMISSION_MESSAGE)]
    PermissionDenied,
}
