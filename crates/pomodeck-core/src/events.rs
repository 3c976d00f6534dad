use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, RunState};

/// Every state change in the timer produces an Event.
/// The front-end renders from snapshots; the widget reacts to completions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero while running. The transition into `next_mode`
    /// has already been applied when this is observed.
    TimerCompleted {
        completed_mode: Mode,
        next_mode: Mode,
        next_duration_secs: u64,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        /// Whether the countdown was resynced to the new duration.
        resynced: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        run_state: RunState,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
}
