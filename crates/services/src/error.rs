//! Shared error types for the services crate.

use thiserror::Error;

use reqwest::StatusCode;

/// Whether a failed call is worth trying again.
///
/// Nothing in this crate retries on its own; the caller decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Retryable,
    Fatal,
}

/// Errors emitted by `BackendClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} returned {content_type} where JSON was expected")]
    NotJson {
        endpoint: String,
        content_type: String,
    },
    #[error("could not attach form field {field}: {source}")]
    InvalidPart {
        field: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Transport failures, 5xx and 429 may succeed later; everything else will not.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport { .. } => FailureKind::Retryable,
            ApiError::Status { status, .. }
                if status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS =>
            {
                FailureKind::Retryable
            }
            _ => FailureKind::Fatal,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Retryable
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors emitted by `AssessmentFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("an assessment submission is already in flight")]
    AlreadySubmitting,
    #[error("assessment was already submitted")]
    AlreadySubmitted,
    #[error("an email address is required to submit")]
    MissingEmail,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by audio capture.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecorderError {
    #[error("{}", mindcheck_core::games::speech::PERMISSION_MESSAGE)]
    PermissionDenied,
    #[error("recorder is not running")]
    NotRecording,
    #[error("recorder is already running")]
    AlreadyRecording,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted by `ReportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("backend did not return a report id")]
    MissingReportId,
    #[error("report id {0:?} cannot be used as a file name")]
    InvalidReportId(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
