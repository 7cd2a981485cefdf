//! One-second countdowns driven by a tokio task.
//!
//! [`start_countdown`] hands back a [`CountdownHandle`]; the task stops when
//! the handle is cancelled or dropped, whichever comes first.

use std::time::Duration;

use mindcheck_core::countdown::{Countdown, CountdownTick};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Seconds left after this tick.
    Tick(u32),
    /// Sent once when the count reaches zero.
    Elapsed,
}

/// Owner of a running countdown. Dropping it cancels the task.
#[derive(Debug)]
pub struct CountdownHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown. Safe to call more than once.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start counting down from `seconds`, one event per second.
///
/// Must be called inside a tokio runtime.
pub fn start_countdown(seconds: u32) -> (CountdownHandle, mpsc::UnboundedReceiver<CountdownEvent>) {
    let token = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        tracing::debug!(target: "countdown", seconds, "countdown_started");
        let mut countdown = Countdown::new(seconds);
        if countdown.is_elapsed() {
            let _ = tx.send(CountdownEvent::Elapsed);
            return;
        }

        let mut interval = interval_at(Instant::now() + TICK, TICK);
        loop {
            tokio::select! {
                () = cancelled.cancelled() => {
                    tracing::debug!(
                        target: "countdown",
                        remaining = countdown.remaining(),
                        "countdown_cancelled"
                    );
                    break;
                }
                _ = interval.tick() => {
                    let event = match countdown.tick() {
                        CountdownTick::Running(left) => CountdownEvent::Tick(left),
                        CountdownTick::Elapsed | CountdownTick::Finished => CountdownEvent::Elapsed,
                    };
                    if tx.send(event).is_err() || event == CountdownEvent::Elapsed {
                        break;
                    }
                }
            }
        }
        tracing::debug!(target: "countdown", elapsed = countdown.elapsed(), "countdown_stopped");
    });

    (CountdownHandle { token, task }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_then_elapses_once() {
        let start = Instant::now();
        let (_handle, mut rx) = start_countdown(3);
        assert_eq!(rx.recv().await, Some(CountdownEvent::Tick(2)));
        assert_eq!(rx.recv().await, Some(CountdownEvent::Tick(1)));
        assert_eq!(rx.recv().await, Some(CountdownEvent::Elapsed));
        assert_eq!(rx.recv().await, None);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_seconds_elapses_immediately() {
        let (_handle, mut rx) = start_countdown(0);
        assert_eq!(rx.recv().await, Some(CountdownEvent::Elapsed));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_events() {
        let (handle, mut rx) = start_countdown(10);
        assert_eq!(rx.recv().await, Some(CountdownEvent::Tick(9)));
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let (handle, mut rx) = start_countdown(60);
        drop(handle);
        assert_eq!(rx.recv().await, None);
    }
}
