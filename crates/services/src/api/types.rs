use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Risk estimate attached to a submission response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitiveRisk {
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

/// Body returned by `POST /api/submit-tests`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
    pub summary_report: Option<String>,
    pub evaluation: Option<Value>,
    pub doctor_report: Option<String>,
    pub cognitive_risk: Option<CognitiveRisk>,
    pub pdf_filename: Option<String>,
    pub ai_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Connected(Value),
    Unreachable(String),
}

impl HealthStatus {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, HealthStatus::Connected(_))
    }
}

/// JSON body for `POST /api/games/results`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultsRequest {
    pub user_id: Option<String>,
    pub game_type: String,
    pub score: i64,
    pub accuracy: u8,
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub metadata: std::collections::BTreeMap<String, String>,
}

/// One past game as listed by `GET /api/results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(alias = "type", alias = "game_type")]
    pub game_type: String,
    pub score: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
}

/// The results list; the backend may wrap it or send it bare.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResultsBody {
    Wrapped { results: Vec<GameRecord> },
    Bare(Vec<GameRecord>),
}

impl ResultsBody {
    #[must_use]
    pub fn into_records(self) -> Vec<GameRecord> {
        match self {
            ResultsBody::Wrapped { results } | ResultsBody::Bare(results) => results,
        }
    }
}

/// Query parameters for `GET /api/results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl ResultFilters {
    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(game_type) = &self.game_type {
            pairs.push(("gameType", game_type.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(period) = &self.period {
            pairs.push(("period", period.clone()));
        }
        pairs
    }
}

/// Body of `GET /api/results/score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskScore {
    #[serde(alias = "risk_score")]
    pub score: Option<f64>,
    pub category: Option<String>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub user_id: Option<String>,
    pub report_type: String,
    pub period: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/results/report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportTicket {
    #[serde(alias = "report_id", alias = "id")]
    pub report_id: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "download_url")]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRequest {
    pub user_id: Option<String>,
    pub text: String,
    pub context: String,
    pub timestamp: DateTime<Utc>,
}

/// Metadata sent with `POST /api/speech/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTask {
    pub task_type: String,
    pub prompt: String,
    pub duration_secs: u64,
}

/// Either parsed JSON or raw bytes, depending on the response content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Bytes { content_type: String, bytes: Vec<u8> },
}
