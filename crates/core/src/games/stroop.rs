use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::countdown::{Countdown, CountdownTick};
use crate::games::GameError;
use crate::model::{GameKind, GameResult, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

/// Length of one Stroop round.
pub const STROOP_SECONDS: u32 = 60;

pub const CONGRUENT_POINTS: u32 = 10;
pub const INCONGRUENT_POINTS: u32 = 15;

pub const STROOP_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Pause, Phase::Paused),
    Transition::new(Phase::Paused, PhaseEvent::Resume, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::TimerElapsed, Phase::Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InkColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl InkColor {
    pub const ALL: [InkColor; 6] = [
        InkColor::Red,
        InkColor::Blue,
        InkColor::Green,
        InkColor::Yellow,
        InkColor::Purple,
        InkColor::Orange,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InkColor::Red => "RED",
            InkColor::Blue => "BLUE",
            InkColor::Green => "GREEN",
            InkColor::Yellow => "YELLOW",
            InkColor::Purple => "PURPLE",
            InkColor::Orange => "ORANGE",
        }
    }

    #[must_use]
    pub fn hex(&self) -> &'static str {
        match self {
            InkColor::Red => "#EF4444",
            InkColor::Blue => "#3B82F6",
            InkColor::Green => "#10B981",
            InkColor::Yellow => "#F59E0B",
            InkColor::Purple => "#8B5CF6",
            InkColor::Orange => "#F97316",
        }
    }

    /// Case-insensitive lookup by colour name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }
}

/// A colour word printed in some ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StroopTrial {
    pub word: InkColor,
    pub ink: InkColor,
}

impl StroopTrial {
    #[must_use]
    pub fn congruent(&self) -> bool {
        self.word == self.ink
    }
}

/// Points for naming `answer` as the ink of `trial`.
#[must_use]
pub fn points_for(trial: StroopTrial, answer: InkColor) -> u32 {
    if answer != trial.ink {
        0
    } else if trial.congruent() {
        CONGRUENT_POINTS
    } else {
        INCONGRUENT_POINTS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StroopAnswer {
    pub correct: bool,
    pub points: u32,
    pub trial: StroopTrial,
}

/// Timed colour-word interference test.
#[derive(Debug, Clone)]
pub struct StroopGame {
    machine: PhaseMachine,
    rng: StdRng,
    countdown: Countdown,
    trial: Option<StroopTrial>,
    score: u32,
    correct: u32,
    total: u32,
    reaction_ms: Vec<u64>,
}

impl Default for StroopGame {
    fn default() -> Self {
        Self::new()
    }
}

impl StroopGame {
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
            machine: PhaseMachine::new(STROOP_TRANSITIONS),
            rng,
            countdown: Countdown::new(STROOP_SECONDS),
            trial: None,
            score: 0,
            correct: 0,
            total: 0,
            reaction_ms: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn current_trial(&self) -> Option<StroopTrial> {
        self.trial
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is showing instructions.
    pub fn start(&mut self) -> Result<StroopTrial, GameError> {
        self.machine.fire(PhaseEvent::Start)?;
        self.countdown = Countdown::new(STROOP_SECONDS);
        self.score = 0;
        self.correct = 0;
        self.total = 0;
        self.reaction_ms.clear();
        Ok(self.next_trial())
    }

    /// Answer the current trial and move to a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is running.
    pub fn answer(&mut self, color: InkColor, reaction_ms: u64) -> Result<StroopAnswer, GameError> {
        self.machine.ensure(Phase::Playing)?;
        let trial = match self.trial {
            Some(trial) => trial,
            None => self.next_trial(),
        };

        let points = points_for(trial, color);
        let correct = color == trial.ink;
        self.total += 1;
        self.reaction_ms.push(reaction_ms);
        if correct {
            self.correct += 1;
            self.score += points;
        }

        self.next_trial();
        Ok(StroopAnswer {
            correct,
            points,
            trial,
        })
    }

    /// One second of play time. Ignored while paused.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` if the game has not started or is over.
    pub fn tick(&mut self) -> Result<CountdownTick, GameError> {
        if self.machine.is(Phase::Paused) {
            return Ok(CountdownTick::Running(self.countdown.remaining()));
        }
        self.machine.ensure(Phase::Playing)?;
        let tick = self.countdown.tick();
        if matches!(tick, CountdownTick::Elapsed | CountdownTick::Finished) {
            self.machine.fire(PhaseEvent::TimerElapsed)?;
            self.trial = None;
        }
        Ok(tick)
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
        self.countdown = Countdown::new(STROOP_SECONDS);
        self.trial = None;
        self.score = 0;
        self.correct = 0;
        self.total = 0;
        self.reaction_ms.clear();
    }

    #[must_use]
    pub fn accuracy(&self) -> u8 {
        percent(self.correct, self.total)
    }

    #[must_use]
    pub fn average_reaction_ms(&self) -> u64 {
        if self.reaction_ms.is_empty() {
            return 0;
        }
        let sum: u64 = self.reaction_ms.iter().sum();
        let count = u64::try_from(self.reaction_ms.len()).unwrap_or(u64::MAX);
        (sum + count / 2) / count
    }

    #[must_use]
    pub fn result(&self) -> GameResult {
        GameResult::new(
            GameKind::Stroop,
            i64::from(self.score),
            self.accuracy(),
            u64::from(self.countdown.elapsed()),
        )
        .with_meta("avg_response_ms", self.average_reaction_ms())
        .with_meta("total_questions", self.total)
        .with_meta("correct_answers", self.correct)
        .with_meta("time_limit", STROOP_SECONDS)
    }

    fn next_trial(&mut self) -> StroopTrial {
        let word = InkColor::ALL[self.rng.random_range(0..InkColor::ALL.len())];
        let ink = if self.rng.random_bool(0.5) {
            word
        } else {
            InkColor::ALL[self.rng.random_range(0..InkColor::ALL.len())]
        };
        let trial = StroopTrial { word, ink };
        self.trial = Some(trial);
        trial
    }
}
