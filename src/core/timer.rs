//! # Repeating timers on the tokio runtime.
//!
//! [`schedule_repeating`] spawns one loop per timer. The loop waits for the next
//! tick and calls `on_tick`; it never waits for work started by `on_tick`, so a
//! slow execution does not delay the next firing.
//!
//! ## Period rules
//! - truncated to whole milliseconds
//! - below 1 ms or above [`MAX_PERIOD_MS`] → 1 ms
//! - the first tick fires one period after scheduling
//!
//! ## Cancellation
//! [`TimerHandle::cancel`] stops future ticks. A tick already handed to
//! `on_tick` is unaffected.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Largest accepted period in milliseconds (`i32::MAX`).
pub const MAX_PERIOD_MS: u128 = 2_147_483_647;

/// Applies the period rules.
///
/// ```
/// use std::time::Duration;
/// use tickvisor::normalize_period;
///
/// assert_eq!(normalize_period(Duration::ZERO), Duration::from_millis(1));
/// assert_eq!(normalize_period(Duration::from_micros(2_900)), Duration::from_millis(2));
/// assert_eq!(normalize_period(Duration::from_secs(30 * 24 * 3600)), Duration::from_millis(1));
/// ```
pub fn normalize_period(period: Duration) -> Duration {
    let ms = period.as_millis();
    if (1..=MAX_PERIOD_MS).contains(&ms) {
        Duration::from_millis(ms as u64)
    } else {
        Duration::from_millis(1)
    }
}

/// Handle to a spawned timer loop.
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
    period: Duration,
}

impl TimerHandle {
    /// Stops future ticks. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Normalized period of this timer.
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Spawns a loop calling `on_tick` every `period` (normalized).
///
/// `on_tick` returning [`ControlFlow::Break`] ends the loop, as does cancellation.
/// Must be called from within a tokio runtime.
pub fn schedule_repeating<F>(period: Duration, mut on_tick: F) -> TimerHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let period = normalize_period(period);
    let token = CancellationToken::new();
    let stop = token.clone();

    tokio::spawn(async move {
        let mut ticks = time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = ticks.tick() => {
                    if on_tick().is_break() {
                        break;
                    }
                }
            }
        }
    });

    TimerHandle { token, period }
}
