use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::countdown::{Countdown, CountdownTick};
use crate::games::GameError;
use crate::model::{GameKind, GameResult, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

pub const STUDY_SECONDS: u32 = 10;
pub const LEVELS: u32 = 5;
pub const MAX_STUDY_ITEMS: usize = 12;

pub const IMAGE_RECALL_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Study),
    Transition::new(Phase::Study, PhaseEvent::StudyElapsed, Phase::Recall),
    Transition::new(Phase::Recall, PhaseEvent::LevelCleared, Phase::Study),
    Transition::new(Phase::Recall, PhaseEvent::Finish, Phase::Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecallItem {
    pub id: u8,
    pub symbol: &'static str,
    pub label: &'static str,
}

impl RecallItem {
    const fn new(id: u8, symbol: &'static str, label: &'static str) -> Self {
        Self { id, symbol, label }
    }
}

pub const CATALOGUE: [RecallItem; 20] = [
    RecallItem::new(1, "🍎", "Apple"),
    RecallItem::new(2, "🚗", "Car"),
    RecallItem::new(3, "🏠", "House"),
    RecallItem::new(4, "🌸", "Flower"),
    RecallItem::new(5, "📱", "Phone"),
    RecallItem::new(6, "⚽", "Ball"),
    RecallItem::new(7, "🎸", "Guitar"),
    RecallItem::new(8, "📚", "Book"),
    RecallItem::new(9, "🍕", "Pizza"),
    RecallItem::new(10, "🌳", "Tree"),
    RecallItem::new(11, "✈️", "Plane"),
    RecallItem::new(12, "⌚", "Watch"),
    RecallItem::new(13, "🎵", "Music"),
    RecallItem::new(14, "💡", "Bulb"),
    RecallItem::new(15, "🎂", "Cake"),
    RecallItem::new(16, "🔑", "Key"),
    RecallItem::new(17, "👓", "Glasses"),
    RecallItem::new(18, "🌟", "Star"),
    RecallItem::new(19, "🦋", "Butterfly"),
    RecallItem::new(20, "🎨", "Art"),
];

/// Number of items to memorise on `level`.
#[must_use]
pub fn study_size(level: u32) -> usize {
    let level = usize::try_from(level).unwrap_or(usize::MAX);
    level.saturating_add(4).min(MAX_STUDY_ITEMS)
}

/// Correct picks minus wrong picks, never below zero.
#[must_use]
pub fn level_score(correct: usize, incorrect: usize) -> u32 {
    u32::try_from(correct.saturating_sub(incorrect)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecallOutcome {
    pub correct: usize,
    pub incorrect: usize,
    pub level_score: u32,
    pub total: u32,
    pub completed: bool,
}

/// Study a set of pictures, then pick them out of a larger grid.
#[derive(Debug, Clone)]
pub struct ImageRecallGame {
    machine: PhaseMachine,
    rng: StdRng,
    level: u32,
    score: u32,
    study_timer: Countdown,
    study: Vec<RecallItem>,
    choices: Vec<RecallItem>,
    selected: BTreeSet<usize>,
    correct_total: usize,
    picks_total: usize,
}

impl Default for ImageRecallGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageRecallGame {
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
            machine: PhaseMachine::new(IMAGE_RECALL_TRANSITIONS),
            rng,
            level: 1,
            score: 0,
            study_timer: Countdown::new(STUDY_SECONDS),
            study: Vec::new(),
            choices: Vec::new(),
            selected: BTreeSet::new(),
            correct_total: 0,
            picks_total: 0,
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
    pub fn study_items(&self) -> &[RecallItem] {
        &self.study
    }

    /// The recall grid: study items mixed with distractors.
    #[must_use]
    pub fn choices(&self) -> &[RecallItem] {
        &self.choices
    }

    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn study_time_left(&self) -> u32 {
        self.study_timer.remaining()
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless the game is showing instructions.
    pub fn start(&mut self) -> Result<&[RecallItem], GameError> {
        self.machine.fire(PhaseEvent::Start)?;
        self.level = 1;
        self.score = 0;
        self.correct_total = 0;
        self.picks_total = 0;
        self.generate_level();
        Ok(&self.study)
    }

    /// One second of study time. Moves to recall when it runs out.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` outside the study phase.
    pub fn tick(&mut self) -> Result<CountdownTick, GameError> {
        self.machine.ensure(Phase::Study)?;
        let tick = self.study_timer.tick();
        if matches!(tick, CountdownTick::Elapsed | CountdownTick::Finished) {
            self.machine.fire(PhaseEvent::StudyElapsed)?;
        }
        Ok(tick)
    }

    /// Skip the rest of the study time.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` outside the study phase.
    pub fn end_study(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::StudyElapsed)?;
        Ok(())
    }

    /// Select or deselect the choice at `index`. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// `GameError::Phase` outside recall, `GameError::UnknownItem` for a bad index.
    pub fn toggle(&mut self, index: usize) -> Result<bool, GameError> {
        self.machine.ensure(Phase::Recall)?;
        if index >= self.choices.len() {
            return Err(GameError::UnknownItem(index));
        }
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    /// Score the current selection and move to the next level or finish.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` outside recall.
    pub fn submit_recall(&mut self) -> Result<RecallOutcome, GameError> {
        self.machine.ensure(Phase::Recall)?;

        let correct = self
            .selected
            .iter()
            .filter_map(|i| self.choices.get(*i))
            .filter(|item| self.study.contains(item))
            .count();
        let incorrect = self.selected.len() - correct;
        let gained = level_score(correct, incorrect);

        self.score += gained;
        self.correct_total += correct;
        self.picks_total += self.selected.len();

        let completed = self.level >= LEVELS;
        if completed {
            self.machine.fire(PhaseEvent::Finish)?;
        } else {
            self.machine.fire(PhaseEvent::LevelCleared)?;
            self.level += 1;
            self.generate_level();
        }

        Ok(RecallOutcome {
            correct,
            incorrect,
            level_score: gained,
            total: self.score,
            completed,
        })
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.level = 1;
        self.score = 0;
        self.study_timer = Countdown::new(STUDY_SECONDS);
        self.study.clear();
        self.choices.clear();
        self.selected.clear();
        self.correct_total = 0;
        self.picks_total = 0;
    }

    #[must_use]
    pub fn result(&self, duration_secs: u64) -> GameResult {
        let accuracy = percent(
            u32::try_from(self.correct_total).unwrap_or(u32::MAX),
            u32::try_from(self.picks_total).unwrap_or(u32::MAX),
        );
        GameResult::new(
            GameKind::ImageRecall,
            i64::from(self.score),
            accuracy,
            duration_secs,
        )
        .with_meta("levels", LEVELS)
        .with_meta("level_reached", self.level)
    }

    fn generate_level(&mut self) {
        let count = study_size(self.level);
        let mut pool = CATALOGUE.to_vec();
        pool.shuffle(&mut self.rng);

        let distractors = count / 2;
        self.study = pool[..count].to_vec();
        self.choices = pool[..count + distractors].to_vec();
        self.choices.shuffle(&mut self.rng);
        self.selected.clear();
        self.study_timer = Countdown::new(STUDY_SECONDS);
    }
}
