//! Audio capture behind a small seam.
//!
//! An [`AudioSource`] delivers raw chunks over a channel until told to stop.
//! [`Recorder`] collects them and turns them into one [`AudioClip`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mindcheck_core::model::{AudioClip, DEFAULT_AUDIO_MIME};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::RecorderError;

pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// A running capture. Chunks stop arriving once `stop` is cancelled.
#[derive(Debug)]
pub struct AudioStream {
    pub chunks: mpsc::Receiver<Vec<u8>>,
    pub stop: CancellationToken,
}

#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Check access to the device without capturing.
    async fn request_permission(&self) -> Result<(), RecorderError>;

    async fn open(&self) -> Result<AudioStream, RecorderError>;

    fn mime_type(&self) -> &str {
        DEFAULT_AUDIO_MIME
    }
}

/// Streams a prerecorded file as if it were a microphone.
#[derive(Debug, Clone)]
pub struct FileAudioSource {
    path: PathBuf,
    chunk_size: usize,
    mime_type: String,
}

impl FileAudioSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_for(&path).to_string();
        Self {
            path,
            chunk_size: DEFAULT_CHUNK_SIZE,
            mime_type,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        _ => DEFAULT_AUDIO_MIME,
    }
}

fn access_error(err: std::io::Error) -> RecorderError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => RecorderError::PermissionDenied,
        _ => RecorderError::Io(err),
    }
}

#[async_trait]
impl AudioSource for FileAudioSource {
    async fn request_permission(&self) -> Result<(), RecorderError> {
        tokio::fs::metadata(&self.path).await.map_err(access_error)?;
        Ok(())
    }

    async fn open(&self) -> Result<AudioStream, RecorderError> {
        let mut file = tokio::fs::File::open(&self.path)
            .await
            .map_err(access_error)?;
        let (tx, rx) = mpsc::channel(8);
        let stop = CancellationToken::new();
        let stopped = stop.clone();
        let chunk_size = self.chunk_size;

        tokio::spawn(async move {
            let mut buf = vec![0u8; chunk_size];
            loop {
                let read = tokio::select! {
                    () = stopped.cancelled() => break,
                    read = file.read(&mut buf) => read,
                };
                match read {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(target: "recorder", error = %err, "read_failed");
                        break;
                    }
                }
            }
        });

        Ok(AudioStream { chunks: rx, stop })
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

struct ActiveRecording {
    stop: CancellationToken,
    collector: JoinHandle<Vec<Vec<u8>>>,
}

/// Buffers chunks from a source between `start` and `stop`.
pub struct Recorder {
    source: Arc<dyn AudioSource>,
    active: Option<ActiveRecording>,
}

impl Recorder {
    #[must_use]
    pub fn new(source: Arc<dyn AudioSource>) -> Self {
        Self {
            source,
            active: None,
        }
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// # Errors
    ///
    /// `RecorderError::PermissionDenied` without device access.
    pub async fn request_permission(&self) -> Result<(), RecorderError> {
        self.source.request_permission().await
    }

    /// # Errors
    ///
    /// `RecorderError::AlreadyRecording` or whatever the source reports.
    pub async fn start(&mut self) -> Result<(), RecorderError> {
        if self.active.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        let AudioStream { mut chunks, stop } = self.source.open().await?;
        let collector = tokio::spawn(async move {
            let mut collected = Vec::new();
            while let Some(chunk) = chunks.recv().await {
                if !chunk.is_empty() {
                    collected.push(chunk);
                }
            }
            collected
        });
        tracing::debug!(target: "recorder", "recording_started");
        self.active = Some(ActiveRecording { stop, collector });
        Ok(())
    }

    /// Stop capturing and return everything buffered so far.
    ///
    /// # Errors
    ///
    /// `RecorderError::NotRecording` if nothing was started.
    pub async fn stop(&mut self) -> Result<AudioClip, RecorderError> {
        let active = self.active.take().ok_or(RecorderError::NotRecording)?;
        active.stop.cancel();
        let chunks = active.collector.await.unwrap_or_default();
        let clip = AudioClip::from_chunks(chunks, self.source.mime_type());
        tracing::debug!(target: "recorder", bytes = clip.len(), "recording_stopped");
        Ok(clip)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop.cancel();
            active.collector.abort();
        }
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("recording", &self.is_recording())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedSource;

    #[async_trait]
    impl AudioSource for DeniedSource {
        async fn request_permission(&self) -> Result<(), RecorderError> {
            Err(RecorderError::PermissionDenied)
        }

        async fn open(&self) -> Result<AudioStream, RecorderError> {
            Err(RecorderError::PermissionDenied)
        }
    }

    /// Sends the given chunks, then waits for stop.
    struct ScriptedSource(Vec<Vec<u8>>);

    #[async_trait]
    impl AudioSource for ScriptedSource {
        async fn request_permission(&self) -> Result<(), RecorderError> {
            Ok(())
        }

        async fn open(&self) -> Result<AudioStream, RecorderError> {
            let (tx, rx) = mpsc::channel(16);
            let stop = CancellationToken::new();
            let stopped = stop.clone();
            let chunks = self.0.clone();
            tokio::spawn(async move {
                for chunk in chunks {
                    if tx.send(chunk).await.is_err() {
                        return;
                    }
                }
                stopped.cancelled().await;
            });
            Ok(AudioStream { chunks: rx, stop })
        }
    }

    #[tokio::test]
    async fn collects_chunks_until_stop() {
        let source = ScriptedSource(vec![vec![1, 2], Vec::new(), vec![3]]);
        let mut recorder = Recorder::new(Arc::new(source));
        recorder.start().await.unwrap();
        assert!(recorder.is_recording());
        tokio::task::yield_now().await;

        let clip = recorder.stop().await.unwrap();
        assert_eq!(clip.bytes(), &[1, 2, 3]);
        assert_eq!(clip.mime_type(), DEFAULT_AUDIO_MIME);
        assert!(!recorder.is_recording());
    }

    #[tokio::test]
    async fn denied_source_reports_permission_message() {
        let mut recorder = Recorder::new(Arc::new(DeniedSource));
        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::PermissionDenied));
        assert_eq!(
            err.to_string(),
            "Microphone access is required for this test. Please grant permission and refresh."
        );
        assert!(matches!(recorder.stop().await, Err(RecorderError::NotRecording)));
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let mut recorder = Recorder::new(Arc::new(ScriptedSource(Vec::new())));
        recorder.start().await.unwrap();
        assert!(matches!(
            recorder.start().await,
            Err(RecorderError::AlreadyRecording)
        ));
    }

    #[tokio::test]
    async fn missing_file_is_permission_denied() {
        let source = FileAudioSource::new("/definitely/not/here.webm");
        assert!(matches!(
            source.request_permission().await,
            Err(RecorderError::PermissionDenied)
        ));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(FileAudioSource::new("a.wav").mime_type(), "audio/wav");
        assert_eq!(FileAudioSource::new("a.webm").mime_type(), "audio/webm");
        assert_eq!(FileAudioSource::new("a").mime_type(), "audio/webm");
    }
}
