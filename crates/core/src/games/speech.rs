use std::collections::BTreeMap;

use crate::games::GameError;
use crate::model::{AudioClip, DEFAULT_AUDIO_MIME, GameKind, GameResult, QuestionId, percent};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, Transition};

pub const PERMISSION_MESSAGE: &str =
    "Microphone access is required for this test. Please grant permission and refresh.";

pub const SPEECH_TRANSITIONS: &[Transition] = &[
    Transition::new(Phase::Instructions, PhaseEvent::Start, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::BeginRecording, Phase::Recording),
    Transition::new(Phase::Recording, PhaseEvent::StopRecording, Phase::Playing),
    Transition::new(Phase::Playing, PhaseEvent::Finish, Phase::Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Four spoken answers, one recording per question.
#[derive(Debug, Clone)]
pub struct SpeechTest {
    machine: PhaseMachine,
    permission: Permission,
    question: QuestionId,
    chunks: Vec<Vec<u8>>,
    mime_type: Option<String>,
    recording_secs: u32,
    recordings: BTreeMap<QuestionId, AudioClip>,
}

impl Default for SpeechTest {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechTest {
    #[must_use]
    pub fn new() -> Self {
        Self {
            machine: PhaseMachine::new(SPEECH_TRANSITIONS),
            permission: Permission::Unknown,
            question: QuestionId::Q1,
            chunks: Vec::new(),
            mime_type: None,
            recording_secs: 0,
            recordings: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Message to show instead of the test, if any.
    #[must_use]
    pub fn permission_error(&self) -> Option<&'static str> {
        (self.permission == Permission::Denied).then_some(PERMISSION_MESSAGE)
    }

    pub fn grant(&mut self) {
        self.permission = Permission::Granted;
    }

    pub fn deny(&mut self) {
        self.permission = Permission::Denied;
    }

    #[must_use]
    pub fn question(&self) -> QuestionId {
        self.question
    }

    #[must_use]
    pub fn recording_secs(&self) -> u32 {
        self.recording_secs
    }

    #[must_use]
    pub fn recording(&self, question: QuestionId) -> Option<&AudioClip> {
        self.recordings.get(&question)
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.recordings.len()
    }

    /// # Errors
    ///
    /// `GameError::PermissionDenied` without microphone access,
    /// `GameError::Phase` if already started.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.permission != Permission::Granted {
            return Err(GameError::PermissionDenied);
        }
        self.machine.fire(PhaseEvent::Start)?;
        self.question = QuestionId::Q1;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a question is showing.
    pub fn begin_recording(&mut self) -> Result<(), GameError> {
        if self.permission != Permission::Granted {
            return Err(GameError::PermissionDenied);
        }
        self.machine.fire(PhaseEvent::BeginRecording)?;
        self.chunks.clear();
        self.mime_type = None;
        self.recording_secs = 0;
        Ok(())
    }

    /// Buffer a chunk delivered by the recorder. Empty chunks are dropped.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not recording.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> Result<(), GameError> {
        self.machine.ensure(Phase::Recording)?;
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Buffer a finished capture, keeping its container type for the answer.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not recording.
    pub fn push_clip(&mut self, clip: AudioClip) -> Result<(), GameError> {
        self.machine.ensure(Phase::Recording)?;
        self.mime_type = Some(clip.mime_type().to_string());
        self.push_chunk(clip.into_bytes())
    }

    /// One second of recording time; returns the running total.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not recording.
    pub fn tick(&mut self) -> Result<u32, GameError> {
        self.machine.ensure(Phase::Recording)?;
        self.recording_secs += 1;
        Ok(self.recording_secs)
    }

    /// Close the recording and keep it as the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` when not recording.
    pub fn stop_recording(&mut self) -> Result<(QuestionId, AudioClip), GameError> {
        self.machine.fire(PhaseEvent::StopRecording)?;
        let mime_type = self
            .mime_type
            .take()
            .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());
        let clip = AudioClip::from_chunks(std::mem::take(&mut self.chunks), mime_type);
        self.recordings.insert(self.question, clip.clone());
        Ok((self.question, clip))
    }

    /// Drop the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a question is showing.
    pub fn delete_recording(&mut self) -> Result<Option<AudioClip>, GameError> {
        self.machine.ensure(Phase::Playing)?;
        self.recording_secs = 0;
        Ok(self.recordings.remove(&self.question))
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a question is showing.
    pub fn next_question(&mut self) -> Result<QuestionId, GameError> {
        self.machine.ensure(Phase::Playing)?;
        if let Some(next) = QuestionId::from_index(self.question.index() + 1) {
            self.question = next;
            self.recording_secs = 0;
        }
        Ok(self.question)
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a question is showing.
    pub fn prev_question(&mut self) -> Result<QuestionId, GameError> {
        self.machine.ensure(Phase::Playing)?;
        if let Some(prev) = self
            .question
            .index()
            .checked_sub(1)
            .and_then(QuestionId::from_index)
        {
            self.question = prev;
            self.recording_secs = 0;
        }
        Ok(self.question)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.question.index() + 1 == QuestionId::ALL.len()
    }

    /// # Errors
    ///
    /// Returns `GameError::Phase` unless a question is showing.
    pub fn finish(&mut self) -> Result<(), GameError> {
        self.machine.fire(PhaseEvent::Finish)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.question = QuestionId::Q1;
        self.chunks.clear();
        self.mime_type = None;
        self.recording_secs = 0;
        self.recordings.clear();
    }

    /// Score is the number of questions answered.
    #[must_use]
    pub fn result(&self, duration_secs: u64) -> GameResult {
        let answered = u32::try_from(self.answered()).unwrap_or(u32::MAX);
        let total = u32::try_from(QuestionId::ALL.len()).unwrap_or(u32::MAX);
        GameResult::new(
            GameKind::Speech,
            i64::from(answered),
            percent(answered, total),
            duration_secs,
        )
        .with_meta("questions", total)
        .with_meta("answered", answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> SpeechTest {
        let mut test = SpeechTest::new();
        test.grant();
        test.start().unwrap();
        test
    }

    #[test]
    fn denied_permission_blocks_start() {
        let mut test = SpeechTest::new();
        test.deny();
        assert_eq!(test.start(), Err(GameError::PermissionDenied));
        assert_eq!(test.permission_error(), Some(PERMISSION_MESSAGE));
        assert_eq!(test.phase(), Phase::Instructions);
        assert_eq!(
            GameError::PermissionDenied.to_string(),
            "Microphone access is required for this test. Please grant permission and refresh."
        );
    }

    #[test]
    fn recording_buffers_chunks_until_stop() {
        let mut test = started();
        test.begin_recording().unwrap();
        test.push_chunk(vec![1, 2]).unwrap();
        test.push_chunk(Vec::new()).unwrap();
        test.push_chunk(vec![3]).unwrap();
        assert_eq!(test.tick().unwrap(), 1);

        let (question, clip) = test.stop_recording().unwrap();
        assert_eq!(question, QuestionId::Q1);
        assert_eq!(clip.bytes(), &[1, 2, 3]);
        assert_eq!(clip.mime_type(), DEFAULT_AUDIO_MIME);
        assert_eq!(test.phase(), Phase::Playing);
        assert!(test.recording(QuestionId::Q1).is_some());
    }

    #[test]
    fn pushed_clip_keeps_its_container_type() {
        let mut test = started();
        test.begin_recording().unwrap();
        test.push_clip(AudioClip::new(b"RIFF".to_vec(), "audio/wav")).unwrap();
        let (_, clip) = test.stop_recording().unwrap();
        assert_eq!(clip.mime_type(), "audio/wav");
        assert_eq!(clip.bytes(), b"RIFF");
        assert_eq!(
            test.recording(QuestionId::Q1).map(AudioClip::mime_type),
            Some("audio/wav")
        );

        test.begin_recording().unwrap();
        test.push_chunk(vec![7]).unwrap();
        let (_, clip) = test.stop_recording().unwrap();
        assert_eq!(clip.mime_type(), DEFAULT_AUDIO_MIME);
    }

    #[test]
    fn chunks_rejected_outside_recording() {
        let mut test = started();
        assert!(test.push_chunk(vec![1]).is_err());
        assert!(test.stop_recording().is_err());
    }

    #[test]
    fn delete_clears_current_answer() {
        let mut test = started();
        test.begin_recording().unwrap();
        test.push_chunk(vec![9]).unwrap();
        test.stop_recording().unwrap();
        assert!(test.delete_recording().unwrap().is_some());
        assert!(test.recording(QuestionId::Q1).is_none());
        assert!(test.delete_recording().unwrap().is_none());
    }

    #[test]
    fn question_navigation_clamps() {
        let mut test = started();
        assert_eq!(test.prev_question().unwrap(), QuestionId::Q1);
        for _ in 0..10 {
            test.next_question().unwrap();
        }
        assert_eq!(test.question(), QuestionId::Q4);
        assert!(test.is_last_question());
        assert_eq!(test.prev_question().unwrap(), QuestionId::Q3);
    }

    #[test]
    fn navigation_blocked_while_recording() {
        let mut test = started();
        test.begin_recording().unwrap();
        assert!(test.next_question().is_err());
    }

    #[test]
    fn result_counts_answers() {
        let mut test = started();
        for _ in 0..2 {
            test.begin_recording().unwrap();
            test.push_chunk(vec![0]).unwrap();
            test.stop_recording().unwrap();
            test.next_question().unwrap();
        }
        test.finish().unwrap();
        let result = test.result(90);
        assert_eq!(result.score, 2);
        assert_eq!(result.accuracy, 50);
        assert_eq!(test.phase(), Phase::Completed);
    }
}
