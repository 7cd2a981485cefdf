mod assessment;
mod audio;
mod game_result;
mod ids;

pub use assessment::{AssessmentSession, StageProgress, SubmissionState, parse_score};
pub use audio::{AudioClip, DEFAULT_AUDIO_MIME};
pub use game_result::{GameKind, GameResult, percent};
pub use ids::{ParseIdError, QuestionId, StageId};
