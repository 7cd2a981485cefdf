use chrono::{DateTime, Utc};
use mindcheck_core::time::relative_label;
use services::DashboardData;

use crate::vm::result_row_vm::{ResultRowVm, map_result_rows};
use crate::vm::risk_vm::RiskVm;
use crate::vm::time_fmt::format_score;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub total_games: usize,
    pub average_score_str: String,
    pub highest_score_str: String,
    /// "Never" when nothing has been played yet.
    pub last_played_str: String,
    pub recent: Vec<ResultRowVm>,
    pub risk: Option<RiskVm>,
}

impl DashboardVm {
    /// `now` anchors the relative "last played" label.
    #[must_use]
    pub fn from_data(data: &DashboardData, now: DateTime<Utc>) -> Self {
        let stats = &data.stats;
        Self {
            total_games: stats.total_games,
            average_score_str: format_score(stats.average_score),
            highest_score_str: if stats.total_games == 0 {
                format_score(0.0)
            } else {
                format_score(stats.highest_score)
            },
            last_played_str: stats
                .last_played
                .map_or_else(|| "Never".to_string(), |at| relative_label(at, now)),
            recent: map_result_rows(&data.recent),
            risk: data.risk.as_ref().map(RiskVm::from),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_games == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mindcheck_core::time::fixed_now;
    use services::DashboardStats;
    use services::api::{GameRecord, RiskScore};

    use super::*;

    #[test]
    fn maps_stats_recent_and_risk() {
        let now = fixed_now();
        let data = DashboardData {
            stats: DashboardStats {
                total_games: 2,
                average_score: 75.24,
                highest_score: 120.0,
                last_played: Some(now - Duration::hours(3)),
            },
            recent: vec![GameRecord {
                game_type: "memory".into(),
                score: 6.0,
                accuracy: None,
                duration: None,
                timestamp: now - Duration::hours(3),
            }],
            risk: Some(RiskScore {
                score: Some(30.0),
                category: Some("low".into()),
                probability: None,
            }),
        };

        let vm = DashboardVm::from_data(&data, now);
        assert_eq!(vm.average_score_str, "75.2");
        assert_eq!(vm.highest_score_str, "120.0");
        assert_eq!(vm.last_played_str, "3 hours ago");
        assert_eq!(vm.recent[0].game_label, "Memory Sequence");
        assert_eq!(vm.risk.map(|r| r.label).as_deref(), Some("Low Risk"));
    }

    #[test]
    fn empty_dashboard_reads_never() {
        let data = DashboardData {
            stats: DashboardStats::default(),
            recent: Vec::new(),
            risk: None,
        };
        let vm = DashboardVm::from_data(&data, fixed_now());
        assert!(vm.is_empty());
        assert_eq!(vm.last_played_str, "Never");
        assert_eq!(vm.highest_score_str, "0.0");
    }
}
