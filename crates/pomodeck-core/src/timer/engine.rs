//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a clock:
//! the caller invokes `tick()` once per second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running <-> Paused
//!    ^          |
//!    +-- reset / cycle_mode / completion without auto-start
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(SettingsStore::default());
//! engine.toggle();
//! // Once per second:
//! if let Some(Event::TimerCompleted { .. }) = engine.tick() {
//!     // fire the alarm
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{format_time, Mode, RunState};
use super::settings::{Settings, SettingsStore};
use crate::error::ValidationError;
use crate::events::Event;

/// Read-only view of the timer for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub run_state: RunState,
    pub time_left_secs: u64,
}

impl TimerSnapshot {
    pub fn display(&self) -> String {
        format_time(self.time_left_secs)
    }
}

/// Core timer engine.
///
/// All fields change together inside a single `&mut self` call, so a
/// snapshot taken between calls never shows a half-applied transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: SettingsStore,
    mode: Mode,
    run_state: RunState,
    time_left_secs: u64,
}

impl TimerEngine {
    /// Create an engine in `Focus`/`Stopped` with the full focus duration.
    pub fn new(settings: SettingsStore) -> Self {
        let time_left_secs = settings.duration_secs(Mode::Focus);
        Self {
            settings,
            mode: Mode::Focus,
            run_state: RunState::Stopped,
            time_left_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    /// Full duration of the current mode.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.mode)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            run_state: self.run_state,
            time_left_secs: self.time_left_secs,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            run_state: self.run_state,
            remaining_secs: self.time_left_secs,
            total_secs: self.total_secs(),
            display: format_time(self.time_left_secs),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `Running` from `Stopped` or `Paused`.
    ///
    /// Allowed with zero time left; the next tick then completes immediately.
    pub fn start(&mut self) -> Option<Event> {
        match self.run_state {
            RunState::Stopped | RunState::Paused => {
                self.run_state = RunState::Running;
                tracing::debug!(mode = ?self.mode, remaining = self.time_left_secs, "timer started");
                Some(Event::TimerStarted {
                    mode: self.mode,
                    remaining_secs: self.time_left_secs,
                    at: Utc::now(),
                })
            }
            RunState::Running => None, // Already running.
        }
    }

    /// The single start/pause control: Running -> Paused, otherwise -> Running.
    pub fn toggle(&mut self) -> Option<Event> {
        match self.run_state {
            RunState::Running => {
                self.run_state = RunState::Paused;
                tracing::debug!(mode = ?self.mode, remaining = self.time_left_secs, "timer paused");
                Some(Event::TimerPaused {
                    mode: self.mode,
                    remaining_secs: self.time_left_secs,
                    at: Utc::now(),
                })
            }
            RunState::Stopped | RunState::Paused => self.start(),
        }
    }

    pub fn reset(&mut self) -> Event {
        self.run_state = RunState::Stopped;
        self.time_left_secs = self.total_secs();
        Event::TimerReset {
            mode: self.mode,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        }
    }

    /// Advance Focus -> ShortBreak -> LongBreak -> Focus. Always stops.
    pub fn cycle_mode(&mut self) -> Event {
        let from = self.mode;
        self.mode = from.cycled();
        self.run_state = RunState::Stopped;
        self.time_left_secs = self.total_secs();
        tracing::debug!(?from, to = ?self.mode, "mode cycled");
        Event::ModeChanged {
            from,
            to: self.mode,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        }
    }

    /// Store new settings. Only a stopped timer picks up the new duration
    /// immediately; a running or paused countdown keeps its time left.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<Event, ValidationError> {
        self.settings.apply(settings)?;
        let resynced = self.run_state == RunState::Stopped;
        if resynced {
            self.time_left_secs = self.total_secs();
        }
        Ok(Event::SettingsApplied {
            resynced,
            at: Utc::now(),
        })
    }

    /// Call once per second. Returns `Some(Event::TimerCompleted)` on the
    /// tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.run_state != RunState::Running {
            return None;
        }
        if self.time_left_secs > 1 {
            self.time_left_secs -= 1;
            return None;
        }
        Some(self.complete())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        let completed_mode = self.mode;
        let next_mode = completed_mode.after_completion();
        let auto_started = self.settings.auto_start(next_mode);
        let next_duration_secs = self.settings.duration_secs(next_mode);

        self.mode = next_mode;
        self.time_left_secs = next_duration_secs;
        self.run_state = if auto_started {
            RunState::Running
        } else {
            RunState::Stopped
        };

        tracing::info!(?completed_mode, ?next_mode, auto_started, "countdown completed");
        Event::TimerCompleted {
            completed_mode,
            next_mode,
            next_duration_secs,
            auto_started,
            at: Utc::now(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(SettingsStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(settings: Settings) -> TimerEngine {
        TimerEngine::new(SettingsStore::new(settings).unwrap())
    }

    fn tick_n(engine: &mut TimerEngine, n: u64) -> usize {
        (0..n).filter_map(|_| engine.tick()).count()
    }

    #[test]
    fn starts_stopped_in_focus_with_full_duration() {
        let engine = TimerEngine::default();
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.run_state(), RunState::Stopped);
        assert_eq!(engine.time_left_secs(), 1800);
    }

    #[test]
    fn toggle_cycles_running_and_paused() {
        let mut engine = TimerEngine::default();
        assert!(engine.toggle().is_some());
        assert_eq!(engine.run_state(), RunState::Running);
        assert!(engine.toggle().is_some());
        assert_eq!(engine.run_state(), RunState::Paused);
        assert!(engine.toggle().is_some());
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = TimerEngine::default();
        engine.start();
        assert!(engine.start().is_none());
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn tick_ignored_unless_running() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 1800);

        engine.start();
        engine.tick();
        engine.toggle();
        engine.tick();
        assert_eq!(engine.time_left_secs(), 1799);
        assert_eq!(engine.run_state(), RunState::Paused);
    }

    #[test]
    fn reset_restores_full_duration_and_keeps_mode() {
        let mut engine = TimerEngine::default();
        engine.cycle_mode();
        engine.start();
        tick_n(&mut engine, 10);
        engine.reset();
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.run_state(), RunState::Stopped);
        assert_eq!(engine.time_left_secs(), 360);
    }

    #[test]
    fn cycle_mode_always_stops() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.cycle_mode();
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.run_state(), RunState::Stopped);
        assert_eq!(engine.time_left_secs(), 360);

        engine.cycle_mode();
        assert_eq!(engine.mode(), Mode::LongBreak);
        assert_eq!(engine.time_left_secs(), 900);

        engine.cycle_mode();
        assert_eq!(engine.mode(), Mode::Focus);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut engine = engine_with(Settings {
            focus_hours: 10.0 / 3600.0,
            ..Settings::default()
        });
        assert_eq!(engine.time_left_secs(), 10);
        engine.start();
        assert_eq!(tick_n(&mut engine, 9), 0);
        assert_eq!(engine.time_left_secs(), 1);
        assert_eq!(tick_n(&mut engine, 1), 1);
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.run_state(), RunState::Stopped);
        // Stopped after completion: further ticks do nothing.
        assert_eq!(tick_n(&mut engine, 100), 0);
    }

    #[test]
    fn auto_start_chain_matches_settings() {
        let mut engine = engine_with(Settings {
            focus_hours: 0.5,
            short_break_hours: 0.1,
            long_break_hours: 0.25,
            auto_start_breaks: true,
            auto_start_focus: false,
        });
        engine.start();

        assert_eq!(tick_n(&mut engine, 1800), 1);
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.time_left_secs(), 360);
        assert_eq!(engine.run_state(), RunState::Running);

        assert_eq!(tick_n(&mut engine, 360), 1);
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.time_left_secs(), 1800);
        assert_eq!(engine.run_state(), RunState::Stopped);
    }

    #[test]
    fn long_break_completes_into_focus() {
        let mut engine = engine_with(Settings {
            long_break_hours: 3.0 / 3600.0,
            auto_start_focus: true,
            ..Settings::default()
        });
        engine.cycle_mode();
        engine.cycle_mode();
        engine.start();
        match tick_n_events(&mut engine, 3).as_slice() {
            [Event::TimerCompleted {
                completed_mode,
                next_mode,
                auto_started,
                ..
            }] => {
                assert_eq!(*completed_mode, Mode::LongBreak);
                assert_eq!(*next_mode, Mode::Focus);
                assert!(*auto_started);
            }
            other => panic!("Expected one TimerCompleted, got {other:?}"),
        }
        assert_eq!(engine.run_state(), RunState::Running);
    }

    fn tick_n_events(engine: &mut TimerEngine, n: u64) -> Vec<Event> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn settings_change_while_running_keeps_countdown() {
        let mut engine = TimerEngine::default();
        engine.start();
        tick_n(&mut engine, 5);
        engine
            .apply_settings(Settings {
                focus_hours: 1.0,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(engine.time_left_secs(), 1795);

        engine.reset();
        assert_eq!(engine.time_left_secs(), 3600);
    }

    #[test]
    fn settings_change_while_stopped_resyncs() {
        let mut engine = TimerEngine::default();
        let event = engine
            .apply_settings(Settings {
                focus_hours: 0.75,
                ..Settings::default()
            })
            .unwrap();
        assert!(matches!(event, Event::SettingsApplied { resynced: true, .. }));
        assert_eq!(engine.time_left_secs(), 2700);
    }

    #[test]
    fn invalid_settings_are_rejected_without_side_effects() {
        let mut engine = TimerEngine::default();
        let result = engine.apply_settings(Settings {
            focus_hours: -1.0,
            ..Settings::default()
        });
        assert!(result.is_err());
        assert_eq!(engine.time_left_secs(), 1800);
        assert_eq!(engine.settings(), &Settings::default());
    }

    #[test]
    fn snapshot_event_reports_display() {
        let engine = TimerEngine::default();
        match engine.snapshot_event() {
            Event::StateSnapshot {
                mode,
                run_state,
                remaining_secs,
                display,
                ..
            } => {
                assert_eq!(mode, Mode::Focus);
                assert_eq!(run_state, RunState::Stopped);
                assert_eq!(remaining_secs, 1800);
                assert_eq!(display, "30:00");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
