//! A small table-driven state machine shared by every mini-game.
//!
//! Each game declares its legal moves as a static `&[Transition]`; the
//! machine only ever moves along an entry of that table. `Reset` is accepted
//! from every phase and always lands on `Instructions`.

use std::fmt;

use thiserror::Error;

/// UI phase of a mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Instructions,
    /// Material is being presented and must be memorised.
    Study,
    Playing,
    Paused,
    /// The player answers from memory.
    Recall,
    Recording,
    Completed,
}

impl Phase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Instructions => "instructions",
            Phase::Study => "study",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Recall => "recall",
            Phase::Recording => "recording",
            Phase::Completed => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can move a game from one phase to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    Start,
    SequenceShown,
    StudyElapsed,
    Pause,
    Resume,
    LevelCleared,
    LevelFailed,
    TimerElapsed,
    Finish,
    BeginRecording,
    StopRecording,
    Reset,
}

/// One legal move: `from` + `event` => `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub event: PhaseEvent,
    pub to: Phase,
}

impl Transition {
    #[must_use]
    pub const fn new(from: Phase, event: PhaseEvent, to: Phase) -> Self {
        Self { from, event, to }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhaseError {
    #[error("cannot apply {event:?} while {from}")]
    InvalidTransition { from: Phase, event: PhaseEvent },

    #[error("expected phase {expected} but game is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
}

/// Current phase plus the table that constrains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
    table: &'static [Transition],
}

impl PhaseMachine {
    #[must_use]
    pub const fn new(table: &'static [Transition]) -> Self {
        Self {
            phase: Phase::Instructions,
            table,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is(&self, phase: Phase) -> bool {
        self.phase == phase
    }

    fn target(&self, event: PhaseEvent) -> Option<Phase> {
        if event == PhaseEvent::Reset {
            return Some(Phase::Instructions);
        }
        self.table
            .iter()
            .find(|t| t.from == self.phase && t.event == event)
            .map(|t| t.to)
    }

    /// Guard for input that is only meaningful in one phase.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::WrongPhase` when the machine is elsewhere.
    pub fn ensure(&self, expected: Phase) -> Result<(), PhaseError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(PhaseError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    #[must_use]
    pub fn can_fire(&self, event: PhaseEvent) -> bool {
        self.target(event).is_some()
    }

    /// Apply `event`, returning the new phase.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` if the table has no entry for
    /// the current phase and `event`; the phase is left unchanged.
    pub fn fire(&mut self, event: PhaseEvent) -> Result<Phase, PhaseError> {
        let to = self.target(event).ok_or(PhaseError::InvalidTransition {
            from: self.phase,
            event,
        })?;
        self.phase = to;
        Ok(to)
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Instructions;
    }
}
