use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::games::GameError;
use crate::model::{GameKind, GameResult, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

pub const MATCHING_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Pause, Phase::Paused),
    Transition::new(Phase::Paused, PhaseEvent::Resume, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::LevelCleared, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Finish, Phase::Completed),
];

pub const BASE_POINTS: u32 = 100;
pub const MIN_POINTS: u32 = 50;
pub const PENALTY_PER_MISS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPair {
    pub object: &'static str,
    pub object_name: &'static str,
    pub purpose: &'static str,
    pub purpose_name: &'static str,
    pub description: &'static str,
}

const fn pair(
    object: &'static str,
    object_name: &'static str,
    purpose: &'static str,
    purpose_name: &'static str,
    description: &'static str,
) -> MatchPair {
    MatchPair {
        object,
        object_name,
        purpose,
        purpose_name,
        description,
    }
}

const LEVEL_ONE: &[MatchPair] = &[
    pair("🔑", "Key", "🚪", "Door", "Opens doors and locks"),
    pair("✏️", "Pencil", "📝", "Writing", "Used for writing and drawing"),
    pair("🍴", "Fork", "🍽️", "Eating", "Eating utensil for food"),
    pair("📱", "Phone", "📞", "Calling", "Communication device"),
];

const LEVEL_TWO: &[MatchPair] = &[
    pair("🔍", "Magnifying Glass", "👁️", "Seeing", "Magnifies small objects"),
    pair("🧹", "Broom", "🏠", "Cleaning", "Sweeps floors clean"),
    pair("⚒️", "Hammer", "🔨", "Building", "Drives nails and breaks things"),
    pair("🎨", "Paintbrush", "🖼️", "Painting", "Applies paint to surfaces"),
    pair("🔦", "Flashlight", "💡", "Lighting", "Provides light in darkness"),
];

const LEVEL_THREE: &[MatchPair] = &[
    pair("🧭", "Compass", "🗺️", "Navigation", "Shows direction for navigation"),
    pair("🔬", "Microscope", "🦠", "Research", "Examines microscopic specimens"),
    pair("⚖️", "Scale", "📏", "Measuring", "Measures weight accurately"),
    pair("🩺", "Stethoscope", "❤️", "Health", "Listens to heartbeat and breathing"),
    pair("🎻", "Violin", "🎵", "Music", "Creates beautiful music"),
    pair("🔧", "Wrench", "⚙️", "Repair", "Tightens and loosens bolts"),
];

pub const LEVELS: &[&[MatchPair]] = &[LEVEL_ONE, LEVEL_TWO, LEVEL_THREE];

/// Points for a correct match after `misses` wrong attempts in the game so far.
#[must_use]
pub fn points_after(misses: u32) -> u32 {
    BASE_POINTS
        .saturating_sub(misses.saturating_mul(PENALTY_PER_MISS))
        .max(MIN_POINTS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Correct {
        points: u32,
        description: &'static str,
        level_complete: bool,
        game_complete: bool,
    },
    Incorrect {
        object_name: &'static str,
    },
}

/// Object to purpose matching over three levels.
#[derive(Debug, Clone)]
pub struct MatchingGame {
    machine: PhaseMachine,
    rng: StdRng,
    level: usize,
    score: u32,
    incorrect: u32,
    correct: u32,
    matched: BTreeSet<usize>,
    purpose_order: Vec<usize>,
    selected_object: Option<usize>,
}

impl Default for MatchingGame {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingGame {
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
            machine: PhaseMachine::new(MATCHING_TRANSITIONS),
            rng,
            level: 0,
            score: 0,
            incorrect: 0,
            correct: 0,
            matched: BTreeSet::new(),
            purpose_order: Vec::new(),
            selected_object: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// 1-based level number.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level + 1
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn incorrect_attempts(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn pairs(&self) -> &'static [MatchPair] {
        LEVELS.get(self.level).copied().unwrap_or_default()
    }

    /// Purposes in display order, as indices into [`pairs`](Self::pairs).
    #[must_use]
    pub fn purpose_order(&self) -> &[usize] {
        &self.purpose_order
    }

    #[must_use]
    pub fn is_matched(&self, object: usize) -> bool {
        self.matched.contains(&object)
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<usize> {
        self.selected_object
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is showing instructions.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::Start)?;
        self.level = 0;
        self.score = 0;
        self.incorrect = 0;
        self.correct = 0;
        self.load_level();
        Ok(())
    }

    /// # Errors
    ///
    /// `GameError::Phase` when not playing, `UnknownItem` or `AlreadyMatched`
    /// for an object that cannot be picked.
    pub fn select_object(&mut self, object: usize) -> Result<(), GameError> {
        self.machine.ensure(Phase::Playing)?;
        if object >= self.pairs().len() {
            return Err(GameError::UnknownItem(object));
        }
        if self.matched.contains(&object) {
            return Err(GameError::AlreadyMatched(object));
        }
        self.selected_object = Some(object);
        Ok(())
    }

    /// Pick the purpose shown at `slot` for the selected object.
    ///
    /// # Errors
    ///
    /// `GameError::Phase` when not playing, `NothingSelected` without a
    /// selected object, `UnknownItem` for a bad slot.
    pub fn select_purpose(&mut self, slot: usize) -> Result<MatchOutcome, GameError> {
        self.machine.ensure(Phase::Playing)?;
        let object = self.selected_object.ok_or(GameError::NothingSelected)?;
        let purpose = *self
            .purpose_order
            .get(slot)
            .ok_or(GameError::UnknownItem(slot))?;
        let pairs = self.pairs();
        self.selected_object = None;

        if purpose != object {
            self.incorrect += 1;
            return Ok(MatchOutcome::Incorrect {
                object_name: pairs[object].object_name,
            });
        }

        let points = points_after(self.incorrect);
        self.score += points;
        self.correct += 1;
        self.matched.insert(object);

        let level_complete = self.matched.len() >= pairs.len();
        let mut game_complete = false;
        if level_complete {
            if self.level + 1 < LEVELS.len() {
                self.machine.fire(PhaseEvent::LevelCleared)?;
                self.level += 1;
                self.load_level();
            } else {
                self.machine.fire(PhaseEvent::Finish)?;
                game_complete = true;
            }
        }

        Ok(MatchOutcome::Correct {
            points,
            description: pairs[object].description,
            level_complete,
            game_complete,
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
        self.level = 0;
        self.score = 0;
        self.incorrect = 0;
        self.correct = 0;
        self.matched.clear();
        self.purpose_order.clear();
        self.selected_object = None;
    }

    /// Share of match attempts that were right.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        percent(self.correct, self.correct + self.incorrect)
    }

    #[must_use]
    pub fn result(&self, duration_secs: u64) -> GameResult {
        GameResult::new(
            GameKind::Matching,
            i64::from(self.score),
            self.accuracy(),
            duration_secs,
        )
        .with_meta("incorrect_attempts", self.incorrect)
        .with_meta("levels_completed", self.level())
        .with_meta("game_mode", "Object-Purpose Matching")
    }

    fn load_level(&mut self) {
        self.matched.clear();
        self.selected_object = None;
        self.purpose_order = (0..self.pairs().len()).collect();
        self.purpose_order.shuffle(&mut self.rng);
    }
}
