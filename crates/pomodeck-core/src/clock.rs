//! One-second tick source for a running timer.
//!
//! Cancelling is dropping: a `ClockTick` that no longer exists cannot
//! deliver a late tick against stale timer state.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct ClockTick {
    interval: Interval,
}

impl ClockTick {
    /// Repeating pulse whose first tick fires one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn every(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn per_second() -> Self {
        Self::every(TICK_PERIOD)
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Stop ticking. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}
