use mindcheck_core::Clock;
use mindcheck_core::model::{AudioClip, GameResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::payload::SubmissionPayload;
use crate::api::types::{
    GameRecord, GameResultsRequest, HealthStatus, ReportRequest, ReportTicket, ResponseBody,
    ResultFilters, ResultsBody, RiskScore, SentimentRequest, SpeechTask, SubmitResponse,
};
use crate::auth::AuthSession;
use crate::config::AppConfig;
use crate::error::ApiError;

pub const HEALTH_PATH: &str = "/health";
pub const SUBMIT_TESTS_PATH: &str = "/api/submit-tests";
pub const GAME_RESULTS_PATH: &str = "/api/games/results";
pub const SPEECH_UPLOAD_PATH: &str = "/api/speech/upload";
pub const RESULTS_PATH: &str = "/api/results";
pub const RISK_SCORE_PATH: &str = "/api/results/score";
pub const REPORT_PATH: &str = "/api/results/report";
pub const SENTIMENT_PATH: &str = "/api/sentiment-analysis";

pub const DEFAULT_REPORT_TYPE: &str = "comprehensive";
pub const DEFAULT_REPORT_PERIOD: &str = "last-30-days";
pub const DEFAULT_SENTIMENT_CONTEXT: &str = "cognitive-assessment";

/// Thin wrapper over the backend routes. One call, one request; never retries.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
    session: Option<AuthSession>,
    clock: Clock,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str, session: Option<AuthSession>) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::new(),
            base: Url::parse(base_url)?,
            session,
            clock: Clock::default(),
        })
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the configured URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.backend_url, config.session.clone())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    fn user_id(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.user_id.clone())
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.as_ref().and_then(|s| s.access_token.as_deref()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<ResponseBody, ApiError> {
        let transport = |source: reqwest::Error| {
            tracing::warn!(target: "api", endpoint, error = %source, "request_failed");
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(target: "api", endpoint, status = status.as_u16(), "error_status");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await.map_err(transport)?;
        tracing::debug!(target: "api", endpoint, status = status.as_u16(), len = bytes.len(), "response");

        if content_type.contains("application/json") {
            let value = serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
            Ok(ResponseBody::Json(value))
        } else {
            Ok(ResponseBody::Bytes {
                content_type,
                bytes: bytes.to_vec(),
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        match self.send(endpoint, builder).await? {
            ResponseBody::Json(value) => {
                serde_json::from_value(value).map_err(|source| ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            ResponseBody::Bytes { content_type, .. } => Err(ApiError::NotJson {
                endpoint: endpoint.to_string(),
                content_type,
            }),
        }
    }

    /// Probe the backend. Never fails; an unreachable backend is a status.
    pub async fn health(&self) -> HealthStatus {
        let result = match self.url(HEALTH_PATH) {
            Ok(url) => self.send(HEALTH_PATH, self.request(Method::GET, url)).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(ResponseBody::Json(value)) => HealthStatus::Connected(value),
            Ok(ResponseBody::Bytes { bytes, .. }) => {
                HealthStatus::Connected(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(err) => HealthStatus::Unreachable(err.to_string()),
        }
    }

    /// Send a finished assessment as one multipart POST.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-2xx statuses or an
    /// unreadable body.
    pub async fn submit_tests(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmitResponse, ApiError> {
        tracing::info!(
            target: "api",
            memory_score = payload.memory_score,
            stroop_score = payload.stroop_score,
            image_recall_score = payload.image_recall_score,
            audio_files = payload.audio.len(),
            "submit_tests"
        );
        let url = self.url(SUBMIT_TESTS_PATH)?;
        let form = payload.into_form()?;
        self.send_json(
            SUBMIT_TESTS_PATH,
            self.request(Method::POST, url).multipart(form),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn submit_game_results(&self, result: &GameResult) -> Result<Value, ApiError> {
        self.post_game_results(GameResultsRequest {
            user_id: self.user_id(),
            game_type: result.game.as_str().to_string(),
            score: result.score,
            accuracy: result.accuracy,
            duration: result.duration_secs,
            timestamp: self.clock.now(),
            metadata: result.metadata.clone(),
        })
        .await
    }

    pub(crate) async fn post_game_results(
        &self,
        request: GameResultsRequest,
    ) -> Result<Value, ApiError> {
        let url = self.url(GAME_RESULTS_PATH)?;
        self.send_json(
            GAME_RESULTS_PATH,
            self.request(Method::POST, url).json(&request),
        )
        .await
    }

    /// Upload one speech recording with its task description.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn upload_speech(&self, clip: AudioClip, task: &SpeechTask) -> Result<Value, ApiError> {
        let now = self.clock.now();
        let mime = clip.mime_type().to_string();
        let audio = Part::bytes(clip.into_bytes())
            .file_name(format!("speech-recording-{}.webm", now.timestamp_millis()))
            .mime_str(&mime)
            .map_err(|source| ApiError::InvalidPart {
                field: "audio".into(),
                source,
            })?;
        let form = Form::new()
            .part("audio", audio)
            .text("userId", self.user_id().unwrap_or_default())
            .text("taskType", task.task_type.clone())
            .text("taskPrompt", task.prompt.clone())
            .text("duration", task.duration_secs.to_string())
            .text("timestamp", now.to_rfc3339());

        let url = self.url(SPEECH_UPLOAD_PATH)?;
        self.send_json(
            SPEECH_UPLOAD_PATH,
            self.request(Method::POST, url).multipart(form),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the list is malformed.
    pub async fn results(&self, filters: &ResultFilters) -> Result<Vec<GameRecord>, ApiError> {
        let url = self.url(RESULTS_PATH)?;
        let body: ResultsBody = self
            .send_json(
                RESULTS_PATH,
                self.request(Method::GET, url).query(&filters.pairs()),
            )
            .await?;
        Ok(body.into_records())
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn risk_score(&self) -> Result<RiskScore, ApiError> {
        let url = self.url(RISK_SCORE_PATH)?;
        self.send_json(RISK_SCORE_PATH, self.request(Method::GET, url))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn generate_report(&self, report_type: &str) -> Result<ReportTicket, ApiError> {
        let request = ReportRequest {
            user_id: self.user_id(),
            report_type: report_type.to_string(),
            period: DEFAULT_REPORT_PERIOD.to_string(),
            timestamp: self.clock.now(),
        };
        let url = self.url(REPORT_PATH)?;
        self.send_json(REPORT_PATH, self.request(Method::POST, url).json(&request))
            .await
    }

    /// Fetch a report document. Without an id the latest report is returned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn download_report(&self, report_id: Option<&str>) -> Result<Vec<u8>, ApiError> {
        let mut url = self.url(REPORT_PATH)?;
        if let Some(id) = report_id {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push(id);
            }
        }
        let endpoint = url.path().to_string();
        match self.send(&endpoint, self.request(Method::GET, url)).await? {
            ResponseBody::Bytes { bytes, .. } => Ok(bytes),
            ResponseBody::Json(value) => {
                serde_json::to_vec(&value).map_err(|source| ApiError::Decode { endpoint, source })
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    pub async fn sentiment_analysis(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = SentimentRequest {
            user_id: self.user_id(),
            text: text.to_string(),
            context: context.unwrap_or(DEFAULT_SENTIMENT_CONTEXT).to_string(),
            timestamp: self.clock.now(),
        };
        let url = self.url(SENTIMENT_PATH)?;
        self.send_json(SENTIMENT_PATH, self.request(Method::POST, url).json(&request))
            .await
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base", &self.base.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base() {
        let client = BackendClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(
            client.url(SUBMIT_TESTS_PATH).unwrap().as_str(),
            "http://localhost:8000/api/submit-tests"
        );

        let prefixed = BackendClient::new("https://example.test/backend", None).unwrap();
        assert_eq!(
            prefixed.url(HEALTH_PATH).unwrap().as_str(),
            "https://example.test/backend/health"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            BackendClient::new("localhost", None),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let session = AuthSession::new("a@b.com").with_token("secret");
        let client = BackendClient::new("http://localhost:8000", Some(session)).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }
}
