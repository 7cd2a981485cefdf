//! Card-pair concentration. Every card is shown face up for a moment, then
//! turned over; the player turns two at a time looking for pairs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::games::GameError;
use crate::model::{GameKind, GameResult, ParseIdError, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

pub const CARD_MEMORY_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Study),
    Transition::new(Phase::Study, PhaseEvent::StudyElapsed, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Pause, Phase::Paused),
    Transition::new(Phase::Paused, PhaseEvent::Resume, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Finish, Phase::Completed),
];

pub const BASE_SCORE: i64 = 1000;
/// Seconds under which every second saved earns a point.
pub const SPEED_BONUS_SECS: u64 = 300;
pub const EXTRA_MOVE_PENALTY: i64 = 10;

const SYMBOLS: [&str; 12] = [
    "🎨", "🎭", "🎪", "🎯", "🎲", "🎸", "🎺", "🎹", "🎻", "🎬", "🎮", "🎧",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    #[must_use]
    pub fn pairs(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 9,
            Difficulty::Hard => 12,
        }
    }

    /// How long the dealt cards stay face up.
    #[must_use]
    pub fn preview_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 3000,
            Difficulty::Medium => 2000,
            Difficulty::Hard => 1500,
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Score multiplier in halves: x1, x1.5, x2.
    fn multiplier_halves(self) -> i64 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseIdError::new("Difficulty", s)),
        }
    }
}

/// Final score for clearing the board in `elapsed_secs` with `moves` turns.
///
/// Rounds half up after the multiplier and never goes below zero.
#[must_use]
pub fn card_score(difficulty: Difficulty, elapsed_secs: u64, moves: u32) -> i64 {
    let bonus = i64::try_from(SPEED_BONUS_SECS.saturating_sub(elapsed_secs)).unwrap_or(0);
    let pairs = i64::try_from(difficulty.pairs()).unwrap_or(i64::MAX);
    let extra_moves = (i64::from(moves) - pairs).max(0);
    let raw = BASE_SCORE + bonus - extra_moves * EXTRA_MOVE_PENALTY;
    (raw * difficulty.multiplier_halves() + 1).div_euclid(2).max(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a turn.
    Revealed { symbol: &'static str },
    Matched {
        symbol: &'static str,
        pairs_left: usize,
        completed: bool,
    },
    /// Both cards go face down again.
    Mismatch {
        first: &'static str,
        second: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct CardMemoryGame {
    machine: PhaseMachine,
    rng: StdRng,
    difficulty: Difficulty,
    cards: Vec<&'static str>,
    matched: BTreeSet<usize>,
    face_up: Option<usize>,
    moves: u32,
    elapsed_secs: u64,
}

impl Default for CardMemoryGame {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl CardMemoryGame {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    #[must_use]
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            machine: PhaseMachine::new(CARD_MEMORY_TRANSITIONS),
            rng,
            difficulty,
            cards: Vec::new(),
            matched: BTreeSet::new(),
            face_up: None,
            moves: 0,
            elapsed_secs: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Symbols in board order.
    #[must_use]
    pub fn cards(&self) -> &[&'static str] {
        &self.cards
    }

    #[must_use]
    pub fn is_matched(&self, index: usize) -> bool {
        self.matched.contains(&index)
    }

    #[must_use]
    pub fn face_up(&self) -> Option<usize> {
        self.face_up
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn pairs_found(&self) -> usize {
        self.matched.len() / 2
    }

    /// Choose the board size. Only possible before the cards are dealt.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` once the game has started.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.machine.ensure(Phase::Instructions)?;
        self.difficulty = difficulty;
        Ok(())
    }

    /// Deal a shuffled board and show it face up.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is showing instructions.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::Start)?;
        let symbols = &SYMBOLS[..self.difficulty.pairs()];
        self.cards = symbols.iter().chain(symbols).copied().collect();
        self.cards.shuffle(&mut self.rng);
        self.matched.clear();
        self.face_up = None;
        self.moves = 0;
        self.elapsed_secs = 0;
        Ok(())
    }

    /// Turn the board over; the clock starts now.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the preview is showing.
    pub fn end_preview(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::StudyElapsed)?;
        Ok(())
    }

    /// One second of play; paused time does not count.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not playing or paused.
    pub fn tick(&mut self) -> Result<u64, GameError> {
        if !self.machine.is(Phase::Paused) {
            self.machine.ensure(Phase::Playing)?;
            self.elapsed_secs += 1;
        }
        Ok(self.elapsed_secs)
    }

    /// # Errors
    ///
    /// `GameError::Phase` when not playing, `UnknownItem` off the board,
    /// `AlreadyMatched` for a paired card, `AlreadyFaceUp` for the card turned
    /// earlier in this move.
    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        self.machine.ensure(Phase::Playing)?;
        let symbol = *self.cards.get(index).ok_or(GameError::UnknownItem(index))?;
        if self.matched.contains(&index) {
            return Err(GameError::AlreadyMatched(index));
        }

        let Some(first) = self.face_up else {
            self.face_up = Some(index);
            return Ok(FlipOutcome::Revealed { symbol });
        };
        if first == index {
            return Err(GameError::AlreadyFaceUp(index));
        }

        self.face_up = None;
        self.moves += 1;
        let first_symbol = self.cards[first];
        if first_symbol != symbol {
            return Ok(FlipOutcome::Mismatch {
                first: first_symbol,
                second: symbol,
            });
        }

        self.matched.insert(first);
        self.matched.insert(index);
        let pairs_left = self.difficulty.pairs() - self.pairs_found();
        let completed = pairs_left == 0;
        if completed {
            self.machine.fire(PhaseEvent::Finish)?;
        }
        Ok(FlipOutcome::Matched {
            symbol,
            pairs_left,
            completed,
        })
    }

    /// Toggle between playing and paused.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` outside of play.
    pub fn toggle_pause(&mut self) -> Result<Phase, GameError> {
        let event = if self.machine.is(Phase::Paused) {
            PhaseEvent::Resume
        } else {
            PhaseEvent::Pause
        };
        Ok(self.machine.fire(event)?)
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.cards.clear();
        self.matched.clear();
        self.face_up = None;
        self.moves = 0;
        self.elapsed_secs = 0;
    }

    /// Zero until the board is cleared.
    #[must_use]
    pub fn score(&self) -> i64 {
        if self.machine.is(Phase::Completed) {
            card_score(self.difficulty, self.elapsed_secs, self.moves)
        } else {
            0
        }
    }

    /// Share of cards paired.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        let matched = u32::try_from(self.matched.len()).unwrap_or(u32::MAX);
        let total = u32::try_from(self.cards.len()).unwrap_or(u32::MAX);
        percent(matched, total)
    }

    #[must_use]
    pub fn result(&self) -> GameResult {
        GameResult::new(
            GameKind::CardMemory,
            self.score(),
            self.accuracy(),
            self.elapsed_secs,
        )
        .with_meta("difficulty", self.difficulty)
        .with_meta("pairs", self.difficulty.pairs())
        .with_meta("moves", self.moves)
        .with_meta("game_mode", "Memory Game")
    }
}
