use std::collections::BTreeMap;

use crate::model::{AudioClip, QuestionId, StageId};

//
// ─── SUBMISSION STATE ──────────────────────────────────────────────────────────
//

/// Where the one-shot submission of a session currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Progress through the ordered stages, for progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    /// 1-based position of the current stage.
    pub position: usize,
    pub total: usize,
}

impl StageProgress {
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.position.saturating_mul(100) / self.total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory record of one assessment visit.
///
/// Holds the stage pointer, the scores reported by each game and the speech
/// recordings. Nothing here is persisted; dropping the value discards it.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    stages: Vec<StageId>,
    current: usize,
    scores: BTreeMap<StageId, Option<i64>>,
    recordings: BTreeMap<QuestionId, Option<AudioClip>>,
    submission: SubmissionState,
    error_message: Option<String>,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentSession {
    /// A fresh session over the four standard stages.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stages(StageId::ALL.to_vec())
    }

    /// A session over a custom stage list.
    ///
    /// An empty list falls back to the standard stages so the stage pointer
    /// always refers to a real stage.
    #[must_use]
    pub fn with_stages(stages: Vec<StageId>) -> Self {
        let stages = if stages.is_empty() {
            StageId::ALL.to_vec()
        } else {
            stages
        };
        let scores = StageId::scored().map(|stage| (stage, None)).collect();
        let recordings = QuestionId::ALL.into_iter().map(|q| (q, None)).collect();

        Self {
            stages,
            current: 0,
            scores,
            recordings,
            submission: SubmissionState::Idle,
            error_message: None,
        }
    }

    #[must_use]
    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_stage(&self) -> StageId {
        self.stages[self.current]
    }

    #[must_use]
    pub fn is_final_stage(&self) -> bool {
        self.current + 1 >= self.stages.len()
    }

    #[must_use]
    pub fn progress(&self) -> StageProgress {
        StageProgress {
            position: self.current + 1,
            total: self.stages.len(),
        }
    }

    /// Move to the following stage. Returns `false` (and does nothing) at the final stage.
    pub fn next(&mut self) -> bool {
        if self.is_final_stage() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the preceding stage. Returns `false` (and does nothing) at the first stage.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Overwrite the stored score for a stage. No range validation is applied.
    pub fn set_score(&mut self, stage: StageId, value: Option<i64>) {
        self.scores.insert(stage, value);
    }

    #[must_use]
    pub fn score(&self, stage: StageId) -> Option<i64> {
        self.scores.get(&stage).copied().flatten()
    }

    /// Score as submitted: unset scores count as zero.
    #[must_use]
    pub fn score_or_zero(&self, stage: StageId) -> i64 {
        self.score(stage).unwrap_or(0)
    }

    /// Overwrite a stored recording; `None` clears it.
    pub fn set_audio_recording(&mut self, question: QuestionId, clip: Option<AudioClip>) {
        self.recordings.insert(question, clip);
    }

    #[must_use]
    pub fn recording(&self, question: QuestionId) -> Option<&AudioClip> {
        self.recordings.get(&question).and_then(Option::as_ref)
    }

    /// Present recordings in question order.
    pub fn recordings(&self) -> impl Iterator<Item = (QuestionId, &AudioClip)> {
        self.recordings
            .iter()
            .filter_map(|(question, clip)| clip.as_ref().map(|clip| (*question, clip)))
    }

    #[must_use]
    pub fn recording_count(&self) -> usize {
        self.recordings().count()
    }

    #[must_use]
    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Enter `Submitting`, clearing any previous failure message.
    pub fn begin_submission(&mut self) {
        self.submission = SubmissionState::Submitting;
        self.error_message = None;
    }

    pub fn mark_succeeded(&mut self) {
        self.submission = SubmissionState::Succeeded;
        self.error_message = None;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.submission = SubmissionState::Failed;
        self.error_message = Some(message.into());
    }

    /// Return to the initial state: first stage, no scores, no recordings.
    pub fn reset(&mut self) {
        let stages = std::mem::take(&mut self.stages);
        *self = Self::with_stages(stages);
    }
}

/// Parse a numeric score the way form inputs are coerced: anything malformed is zero.
///
/// Leading integer digits are honoured (`"12abc"` is 12), matching lenient
/// integer parsing of form values.
#[must_use]
pub fn parse_score(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(idx, _)| idx);
    digits[..end]
        .parse::<i64>()
        .map(|value| sign * value)
        .unwrap_or(0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_stops_at_final_stage() {
        let mut session = AssessmentSession::new();
        for _ in 0..10 {
            session.next();
            assert!(session.current_index() < session.stage_count());
        }
        assert_eq!(session.current_stage(), StageId::Speech);
        assert!(session.is_final_stage());
        assert!(!session.next());
    }

    #[test]
    fn prev_stops_at_first_stage() {
        let mut session = AssessmentSession::new();
        assert!(!session.prev());
        session.next();
        session.next();
        assert!(session.prev());
        assert!(session.prev());
        assert!(!session.prev());
        assert_eq!(session.current_stage(), StageId::Memory);
    }

    #[test]
    fn mixed_navigation_stays_in_bounds() {
        let mut session = AssessmentSession::new();
        let moves = [true, true, false, true, true, true, false, false, false, false, true];
        for forward in moves {
            if forward {
                session.next();
            } else {
                session.prev();
            }
            assert!(session.current_index() < session.stage_count());
        }
    }

    #[test]
    fn empty_stage_list_falls_back_to_standard() {
        let session = AssessmentSession::with_stages(Vec::new());
        assert_eq!(session.stage_count(), 4);
    }

    #[test]
    fn set_score_then_read_back() {
        let mut session = AssessmentSession::new();
        session.set_score(StageId::Stroop, Some(120));
        assert_eq!(session.score(StageId::Stroop), Some(120));
        session.set_score(StageId::Stroop, Some(-3));
        assert_eq!(session.score(StageId::Stroop), Some(-3));
        session.set_score(StageId::Stroop, None);
        assert_eq!(session.score(StageId::Stroop), None);
        assert_eq!(session.score_or_zero(StageId::Stroop), 0);
    }

    #[test]
    fn clearing_recording_removes_it() {
        let mut session = AssessmentSession::new();
        session.set_audio_recording(QuestionId::Q2, Some(AudioClip::webm(vec![1, 2, 3])));
        assert_eq!(session.recording_count(), 1);
        session.set_audio_recording(QuestionId::Q2, None);
        assert!(session.recording(QuestionId::Q2).is_none());
        assert_eq!(session.recording_count(), 0);
    }

    #[test]
    fn submission_state_transitions() {
        let mut session = AssessmentSession::new();
        assert_eq!(session.submission_state(), SubmissionState::Idle);
        session.begin_submission();
        session.mark_failed("HTTP error! status: 500");
        assert_eq!(session.submission_state(), SubmissionState::Failed);
        assert_eq!(session.error_message(), Some("HTTP error! status: 500"));
        session.begin_submission();
        assert_eq!(session.error_message(), None);
        session.mark_succeeded();
        assert_eq!(session.submission_state(), SubmissionState::Succeeded);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = AssessmentSession::new();
        session.next();
        session.set_score(StageId::Memory, Some(5));
        session.set_audio_recording(QuestionId::Q1, Some(AudioClip::webm(vec![9])));
        session.mark_failed("boom");
        session.reset();

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(StageId::Memory), None);
        assert_eq!(session.recording_count(), 0);
        assert_eq!(session.submission_state(), SubmissionState::Idle);
        assert_eq!(session.error_message(), None);
    }

    #[test]
    fn progress_percent() {
        let mut session = AssessmentSession::new();
        assert_eq!(session.progress().percent(), 25);
        session.next();
        session.next();
        session.next();
        assert_eq!(session.progress(), StageProgress { position: 4, total: 4 });
        assert_eq!(session.progress().percent(), 100);
    }

    #[test]
    fn parse_score_coerces_garbage_to_zero() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score(" 7 "), 7);
        assert_eq!(parse_score("12abc"), 12);
        assert_eq!(parse_score("-4"), -4);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-"), 0);
    }
}
