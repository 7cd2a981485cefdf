/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running(u32),
    /// Reached zero on this tick.
    Elapsed,
    /// Already at zero before this tick.
    Finished,
}

/// Whole-second countdown, the value driven by timers in the games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            total: seconds,
            remaining: seconds,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.total - self.remaining
    }

    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.remaining == 0
    }

    /// Consume one second. `Elapsed` is reported exactly once.
    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining {
            0 => CountdownTick::Finished,
            1 => {
                self.remaining = 0;
                CountdownTick::Elapsed
            }
            n => {
                self.remaining = n - 1;
                CountdownTick::Running(self.remaining)
            }
        }
    }

    pub fn restart(&mut self) {
        self.remaining = self.total;
    }
}

/// `m:ss` rendering used by timers on screen.
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
