use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ParseIdError;

/// The mini-games that can be played standalone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Memory,
    CardMemory,
    Stroop,
    ImageRecall,
    Matching,
    Speech,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Memory,
        GameKind::CardMemory,
        GameKind::Stroop,
        GameKind::ImageRecall,
        GameKind::Matching,
        GameKind::Speech,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory",
            GameKind::CardMemory => "card_memory",
            GameKind::Stroop => "stroop",
            GameKind::ImageRecall => "image_recall",
            GameKind::Matching => "matching",
            GameKind::Speech => "speech",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Memory => "Memory Sequence",
            GameKind::CardMemory => "Memory Card Pairs",
            GameKind::Stroop => "Stroop Color Test",
            GameKind::ImageRecall => "Image Recall",
            GameKind::Matching => "Object-Purpose Matching",
            GameKind::Speech => "Speech Assessment",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            GameKind::Memory => "Repeat a growing sequence of colours",
            GameKind::CardMemory => "Test your working memory and pattern recognition",
            GameKind::Stroop => "Test your cognitive flexibility and attention control",
            GameKind::ImageRecall => "Study a set of images and pick them out again",
            GameKind::Matching => "Match objects with their correct purposes",
            GameKind::Speech => "Evaluate speech patterns through conversation",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "memory" => Ok(GameKind::Memory),
            "card_memory" | "card-memory" | "cards" => Ok(GameKind::CardMemory),
            "stroop" => Ok(GameKind::Stroop),
            "image_recall" | "image-recall" => Ok(GameKind::ImageRecall),
            "matching" => Ok(GameKind::Matching),
            "speech" => Ok(GameKind::Speech),
            other => Err(ParseIdError::new("GameKind", other)),
        }
    }
}

/// Outcome of one completed mini-game, as reported to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game: GameKind,
    pub score: i64,
    /// Whole percent, 0..=100.
    pub accuracy: u8,
    pub duration_secs: u64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl GameResult {
    #[must_use]
    pub fn new(game: GameKind, score: i64, accuracy: u8, duration_secs: u64) -> Self {
        Self {
            game,
            score,
            accuracy: accuracy.min(100),
            duration_secs,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }
}

/// Whole-percent ratio, 0 when nothing was attempted.
#[must_use]
pub fn percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (f64::from(part) / f64::from(whole) * 100.0).round();
    // Clamped to 0..=100 before the cast.
    pct.clamp(0.0, 100.0) as u8
}
