/// Default container for captured speech.
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// An in-memory audio recording for one speech question.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AudioClip {
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Concatenate captured chunks into a single clip.
    #[must_use]
    pub fn from_chunks(chunks: Vec<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        let bytes = chunks.into_iter().flatten().collect();
        Self::new(bytes, mime_type)
    }

    #[must_use]
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self::new(bytes, DEFAULT_AUDIO_MIME)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_chunks_preserves_order() {
        let clip = AudioClip::from_chunks(vec![vec![1, 2], vec![], vec![3]], DEFAULT_AUDIO_MIME);
        assert_eq!(clip.bytes(), &[1, 2, 3]);
        assert_eq!(clip.mime_type(), "audio/webm");
    }

    #[test]
    fn debug_hides_payload() {
        let clip = AudioClip::webm(vec![0; 2048]);
        assert_eq!(
            format!("{clip:?}"),
            "AudioClip { len: 2048, mime_type: \"audio/webm\" }"
        );
    }
}
