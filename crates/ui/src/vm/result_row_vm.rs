use std::str::FromStr;

use mindcheck_core::model::GameKind;
use services::api::GameRecord;

use crate::vm::time_fmt::{format_datetime, format_score};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRowVm {
    pub game_label: String,
    pub score_str: String,
    /// "-" when the backend did not report one.
    pub accuracy_str: String,
    pub played_at_str: String,
}

impl From<&GameRecord> for ResultRowVm {
    fn from(record: &GameRecord) -> Self {
        Self {
            game_label: game_label(&record.game_type),
            score_str: format_score(record.score),
            accuracy_str: record
                .accuracy
                .map_or_else(|| "-".to_string(), |a| format!("{a:.0}%")),
            played_at_str: format_datetime(record.timestamp),
        }
    }
}

/// Known game types get their display title; anything else is shown as sent.
#[must_use]
pub fn game_label(game_type: &str) -> String {
    GameKind::from_str(game_type)
        .map(|kind| kind.title().to_string())
        .unwrap_or_else(|_| game_type.to_string())
}

#[must_use]
pub fn map_result_rows(records: &[GameRecord]) -> Vec<ResultRowVm> {
    records.iter().map(ResultRowVm::from).collect()
}
