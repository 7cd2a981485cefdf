use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::games::GameError;
use crate::model::{GameKind, GameResult, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

/// Highest level; clearing it ends the game.
pub const MAX_LEVEL: u32 = 10;

/// Delay between pad flashes while a sequence is shown.
pub const FLASH_INTERVAL_MS: u64 = 600;

/// Study = the sequence is being flashed, Recall = the player repeats it.
pub const MEMORY_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Study),
    Transition::new(Phase::Study, PhaseEvent::SequenceShown, Phase::Recall),
    Transition::new(Phase::Recall, PhaseEvent::LevelCleared, Phase::Study),
    Transition::new(Phase::Recall, PhaseEvent::LevelFailed, Phase::Completed),
    Transition::new(Phase::Recall, PhaseEvent::Finish, Phase::Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pad {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Pad {
    pub const ALL: [Pad; 4] = [Pad::Red, Pad::Blue, Pad::Green, Pad::Yellow];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Pad::Red => "Red",
            Pad::Blue => "Blue",
            Pad::Green => "Green",
            Pad::Yellow => "Yellow",
        }
    }

    /// 1-based pad number as shown on screen.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Pad::Red => 1,
            Pad::Blue => 2,
            Pad::Green => 3,
            Pad::Yellow => 4,
        }
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }
}

/// Sequence length for a level.
#[must_use]
pub fn sequence_len(level: u32) -> usize {
    usize::try_from(level).unwrap_or(usize::MAX).saturating_add(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Correct so far; more pads to enter.
    Correct { entered: usize, needed: usize },
    /// Whole sequence repeated; the next level is being shown.
    LevelCleared { score: u32, next_level: u32 },
    /// Final level cleared.
    Completed { score: u32 },
    /// Wrong pad. The score stays at the last completed level.
    GameOver { score: u32 },
}

/// Colour-sequence recall game.
#[derive(Debug, Clone)]
pub struct MemoryGame {
    machine: PhaseMachine,
    rng: StdRng,
    level: u32,
    score: u32,
    sequence: Vec<Pad>,
    entered: Vec<Pad>,
    presses: u32,
    correct_presses: u32,
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGame {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            machine: PhaseMachine::new(MEMORY_TRANSITIONS),
            rng,
            level: 1,
            score: 0,
            sequence: Vec::new(),
            entered: Vec::new(),
            presses: 0,
            correct_presses: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn sequence(&self) -> &[Pad] {
        &self.sequence
    }

    #[must_use]
    pub fn entered(&self) -> &[Pad] {
        &self.entered
    }

    /// Begin at level 1 and produce its sequence for display.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is showing instructions.
    pub fn start(&mut self) -> Result<&[Pad], GameError> {
        self.machine.fire(PhaseEvent::Start)?;
        self.level = 1;
        self.score = 0;
        self.presses = 0;
        self.correct_presses = 0;
        self.generate_sequence();
        Ok(&self.sequence)
    }

    /// The sequence has been flashed; accept input.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a sequence is being shown.
    pub fn sequence_shown(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::SequenceShown)?;
        Ok(())
    }

    /// Enter one pad.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not accepting input.
    pub fn press(&mut self, pad: Pad) -> Result<PressOutcome, GameError> {
        self.machine.ensure(Phase::Recall)?;

        self.presses += 1;
        let position = self.entered.len();
        if self.sequence.get(position) != Some(&pad) {
            self.machine.fire(PhaseEvent::LevelFailed)?;
            return Ok(PressOutcome::GameOver { score: self.score });
        }

        self.correct_presses += 1;
        self.entered.push(pad);
        if self.entered.len() < self.sequence.len() {
            return Ok(PressOutcome::Correct {
                entered: self.entered.len(),
                needed: self.sequence.len(),
            });
        }

        self.score = self.level;
        if self.level >= MAX_LEVEL {
            self.machine.fire(PhaseEvent::Finish)?;
            return Ok(PressOutcome::Completed { score: self.score });
        }

        self.machine.fire(PhaseEvent::LevelCleared)?;
        self.level += 1;
        self.generate_sequence();
        Ok(PressOutcome::LevelCleared {
            score: self.score,
            next_level: self.level,
        })
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.level = 1;
        self.score = 0;
        self.sequence.clear();
        self.entered.clear();
        self.presses = 0;
        self.correct_presses = 0;
    }

    #[must_use]
    pub fn result(&self, duration_secs: u64) -> GameResult {
        GameResult::new(
            GameKind::Memory,
            i64::from(self.score),
            percent(self.correct_presses, self.presses),
            duration_secs,
        )
        .with_meta("level", self.level)
        .with_meta("max_level", MAX_LEVEL)
    }

    fn generate_sequence(&mut self) {
        let len = sequence_len(self.level);
        self.sequence = (0..len)
            .map(|_| Pad::ALL[self.rng.random_range(0..Pad::ALL.len())])
            .collect();
        self.entered.clear();
    }
}
