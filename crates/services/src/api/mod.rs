//! HTTP access to the assessment backend.

use async_trait::async_trait;

mod client;
mod payload;
mod types;

pub use client::{
    BackendClient, DEFAULT_REPORT_TYPE, GAME_RESULTS_PATH, HEALTH_PATH, REPORT_PATH, RESULTS_PATH,
    RISK_SCORE_PATH, SENTIMENT_PATH, SPEECH_UPLOAD_PATH, SUBMIT_TESTS_PATH,
};
pub use payload::{AudioPart, SubmissionPayload};
pub use types::{
    CognitiveRisk, GameRecord, GameResultsRequest, HealthStatus, ReportTicket, ResponseBody,
    ResultFilters, RiskScore, SpeechTask, SubmitResponse,
};

use crate::error::ApiError;

/// The one call the assessment flow needs from the backend.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    async fn submit_tests(&self, payload: SubmissionPayload) -> Result<SubmitResponse, ApiError>;
}

#[async_trait]
impl AssessmentApi for BackendClient {
    async fn submit_tests(&self, payload: SubmissionPayload) -> Result<SubmitResponse, ApiError> {
        BackendClient::submit_tests(self, payload).await
    }
}

/// Outcome of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCheck {
    pub name: &'static str,
    pub ok: bool,
    pub detail: Option<String>,
}

impl EndpointCheck {
    fn from_result<T>(name: &'static str, result: Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => Self {
                name,
                ok: true,
                detail: None,
            },
            Err(err) => Self {
                name,
                ok: false,
                detail: Some(err.to_string()),
            },
        }
    }
}

/// Probe health, game results, risk score and results in turn.
pub async fn check_endpoints(client: &BackendClient) -> Vec<EndpointCheck> {
    let mut checks = Vec::with_capacity(4);

    let health = client.health().await;
    checks.push(EndpointCheck {
        name: "Health Check",
        ok: health.is_connected(),
        detail: match health {
            HealthStatus::Connected(_) => None,
            HealthStatus::Unreachable(reason) => Some(reason),
        },
    });

    let check = GameResultsRequest {
        user_id: client.session().and_then(|s| s.user_id.clone()),
        game_type: "test".into(),
        score: 100,
        accuracy: 100,
        duration: 0,
        timestamp: client.now(),
        metadata: Default::default(),
    };
    checks.push(EndpointCheck::from_result(
        "Game Results",
        client.post_game_results(check).await,
    ));
    checks.push(EndpointCheck::from_result(
        "Risk Score",
        client.risk_score().await,
    ));
    checks.push(EndpointCheck::from_result(
        "User Results",
        client.results(&ResultFilters::default()).await,
    ));

    for check in &checks {
        tracing::info!(target: "api", endpoint = check.name, ok = check.ok, "endpoint_check");
    }
    checks
}
