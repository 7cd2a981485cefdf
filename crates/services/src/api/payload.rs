use mindcheck_core::model::{AssessmentSession, AudioClip, StageId};
use reqwest::multipart::{Form, Part};

use crate::error::ApiError;

/// One recorded answer attached as a file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPart {
    pub field: &'static str,
    pub file_name: String,
    pub clip: AudioClip,
}

/// Everything the submit endpoint receives, built from a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub user_email: String,
    pub memory_score: i64,
    pub stroop_score: i64,
    pub image_recall_score: i64,
    pub audio: Vec<AudioPart>,
}

impl SubmissionPayload {
    /// Unset scores are sent as 0; only present recordings are attached.
    #[must_use]
    pub fn from_session(session: &AssessmentSession, user_email: &str) -> Self {
        let audio = session
            .recordings()
            .map(|(question, clip)| AudioPart {
                field: question.form_field(),
                file_name: format!("{}.webm", question.form_field()),
                clip: clip.clone(),
            })
            .collect();

        Self {
            user_email: user_email.to_string(),
            memory_score: session.score_or_zero(StageId::Memory),
            stroop_score: session.score_or_zero(StageId::Stroop),
            image_recall_score: session.score_or_zero(StageId::ImageRecall),
            audio,
        }
    }

    /// Text fields in form order.
    #[must_use]
    pub fn text_fields(&self) -> [(&'static str, String); 4] {
        [
            ("user_email", self.user_email.clone()),
            ("memory_score", self.memory_score.to_string()),
            ("stroop_score", self.stroop_score.to_string()),
            ("image_recall_score", self.image_recall_score.to_string()),
        ]
    }

    /// Every form field name that will be sent.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.text_fields().iter().map(|(name, _)| *name).collect();
        names.extend(self.audio.iter().map(|part| part.field));
        names
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidPart` if a clip carries an unusable MIME type.
    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        for part in self.audio {
            let mime = part.clip.mime_type().to_string();
            let file = Part::bytes(part.clip.into_bytes())
                .file_name(part.file_name)
                .mime_str(&mime)
                .map_err(|source| ApiError::InvalidPart {
                    field: part.field.to_string(),
                    source,
                })?;
            form = form.part(part.field, file);
        }
        Ok(form)
    }
}
