use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %d, %Y %H:%M").to_string()
}

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %d, %Y").to_string()
}

/// One decimal place, the way scores are shown everywhere.
#[must_use]
pub fn format_score(value: f64) -> String {
    format!("{value:.1}")
}
