use chrono::{DateTime, Duration, Utc};

/// Source of "now" for game durations and dashboard timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Whole seconds since `start`, zero if `start` is in the future.
    #[must_use]
    pub fn seconds_since(&self, start: DateTime<Utc>) -> u64 {
        u64::try_from((self.now() - start).num_seconds()).unwrap_or(0)
    }
}

/// Short "how long ago" label for activity lists.
#[must_use]
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now - then;
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    if delta.num_minutes() < 1 {
        "just now".to_string()
    } else if delta.num_hours() < 1 {
        plural(delta.num_minutes(), "minute")
    } else if delta.num_days() < 1 {
        plural(delta.num_hours(), "hour")
    } else {
        plural(delta.num_days(), "day")
    }
}

/// 2023-11-14T22:13:20Z
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default()
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
