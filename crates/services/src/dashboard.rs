use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::api::{BackendClient, GameRecord, ResultFilters, RiskScore};
use crate::error::ApiError;

/// How many entries the recent activity list keeps.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_games: usize,
    pub average_score: f64,
    pub highest_score: f64,
    pub last_played: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub stats: DashboardStats,
    /// Newest first, at most [`RECENT_LIMIT`] entries.
    pub recent: Vec<GameRecord>,
    pub risk: Option<RiskScore>,
}

#[must_use]
pub fn compute_stats(records: &[GameRecord]) -> DashboardStats {
    if records.is_empty() {
        return DashboardStats::default();
    }
    let total: f64 = records.iter().map(|r| r.score).sum();
    let count = records.len();
    DashboardStats {
        total_games: count,
        average_score: total / count as f64,
        highest_score: records
            .iter()
            .map(|r| r.score)
            .fold(f64::NEG_INFINITY, f64::max),
        last_played: records.iter().map(|r| r.timestamp).max(),
    }
}

#[must_use]
pub fn recent_activity(records: &[GameRecord], limit: usize) -> Vec<GameRecord> {
    let mut recent = records.to_vec();
    sort_records(&mut recent, SortBy::Date);
    recent.truncate(limit);
    recent
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Date,
    Score,
    Type,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "score" => Ok(SortBy::Score),
            "type" => Ok(SortBy::Type),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// Date and score sort newest/highest first; type sorts alphabetically.
pub fn sort_records(records: &mut [GameRecord], by: SortBy) {
    match by {
        SortBy::Date => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortBy::Score => records.sort_by(|a, b| b.score.total_cmp(&a.score)),
        SortBy::Type => records.sort_by(|a, b| a.game_type.cmp(&b.game_type)),
    }
}

/// Case-insensitive match on game type for both the search term and the type filter.
#[must_use]
pub fn filter_records(
    records: &[GameRecord],
    search: Option<&str>,
    game_type: Option<&str>,
) -> Vec<GameRecord> {
    let search = search.map(str::to_lowercase).filter(|s| !s.is_empty());
    let game_type = game_type
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty() && t != "all");

    records
        .iter()
        .filter(|record| {
            let kind = record.game_type.to_lowercase();
            let matches_search = search.as_ref().is_none_or(|term| {
                kind.contains(term.as_str()) || record.timestamp.to_rfc3339().contains(term.as_str())
            });
            let matches_type = game_type
                .as_ref()
                .is_none_or(|wanted| kind.contains(wanted.as_str()));
            matches_search && matches_type
        })
        .cloned()
        .collect()
}

/// Results and risk score gathered for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardService {
    client: BackendClient,
}

impl DashboardService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// A missing risk score is not fatal; the dashboard shows without it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the results list cannot be fetched.
    pub async fn load(&self, filters: &ResultFilters) -> Result<DashboardData, ApiError> {
        let records = self.client.results(filters).await?;
        let risk = match self.client.risk_score().await {
            Ok(risk) => Some(risk),
            Err(err) => {
                tracing::warn!(target: "dashboard", error = %err, "risk_score_unavailable");
                None
            }
        };

        Ok(DashboardData {
            stats: compute_stats(&records),
            recent: recent_activity(&records, RECENT_LIMIT),
            risk,
        })
    }
}
