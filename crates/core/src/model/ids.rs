use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four ordered assessment stages.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Memory,
    Stroop,
    ImageRecall,
    Speech,
}

impl StageId {
    /// Stages in the order the assessment walks through them.
    pub const ALL: [StageId; 4] = [
        StageId::Memory,
        StageId::Stroop,
        StageId::ImageRecall,
        StageId::Speech,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Memory => "memory",
            StageId::Stroop => "stroop",
            StageId::ImageRecall => "image_recall",
            StageId::Speech => "speech",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            StageId::Memory => "Memory Game",
            StageId::Stroop => "Stroop Test",
            StageId::ImageRecall => "Image Recall",
            StageId::Speech => "Speech Assessment",
        }
    }

    /// Multipart field carrying this stage's numeric score.
    ///
    /// The speech stage contributes recordings, not a score.
    #[must_use]
    pub fn score_field(&self) -> Option<&'static str> {
        match self {
            StageId::Memory => Some("memory_score"),
            StageId::Stroop => Some("stroop_score"),
            StageId::ImageRecall => Some("image_recall_score"),
            StageId::Speech => None,
        }
    }

    /// Stages that submit a numeric score.
    pub fn scored() -> impl Iterator<Item = StageId> {
        Self::ALL.into_iter().filter(|stage| stage.score_field().is_some())
    }
}

/// One of the four recorded speech questions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionId {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl QuestionId {
    pub const ALL: [QuestionId; 4] = [QuestionId::Q1, QuestionId::Q2, QuestionId::Q3, QuestionId::Q4];

    /// Zero-based position within the speech test.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            QuestionId::Q1 => 0,
            QuestionId::Q2 => 1,
            QuestionId::Q3 => 2,
            QuestionId::Q4 => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn form_field(&self) -> &'static str {
        match self {
            QuestionId::Q1 => "audio_q1",
            QuestionId::Q2 => "audio_q2",
            QuestionId::Q3 => "audio_q3",
            QuestionId::Q4 => "audio_q4",
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self {
            QuestionId::Q1 => {
                "Please describe what you had for breakfast today and why you chose those foods."
            }
            QuestionId::Q2 => {
                "Tell me about your favorite childhood memory and why it's special to you."
            }
            QuestionId::Q3 => "Describe the weather today and how it makes you feel.",
            QuestionId::Q4 => {
                "What are your plans for this weekend? Please provide some details."
            }
        }
    }
}

impl fmt::Debug for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StageId({})", self.as_str())
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.form_field())
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_field())
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from '{}'", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for StageId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "memory" | "memory_score" => Ok(StageId::Memory),
            "stroop" | "stroop_score" => Ok(StageId::Stroop),
            "image_recall" | "image-recall" | "image_recall_score" => Ok(StageId::ImageRecall),
            "speech" => Ok(StageId::Speech),
            other => Err(ParseIdError::new("StageId", other)),
        }
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "audio_q1" | "q1" => Ok(QuestionId::Q1),
            "audio_q2" | "q2" => Ok(QuestionId::Q2),
            "audio_q3" | "q3" => Ok(QuestionId::Q3),
            "audio_q4" | "q4" => Ok(QuestionId::Q4),
            other => Err(ParseIdError::new("QuestionId", other)),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
