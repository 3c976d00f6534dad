//! The timer widget: one engine, one alarm dispatcher, one tick source.
//!
//! Every command runs to completion on the caller's task, reconciles the
//! tick source with the new run-state and publishes a snapshot. A typical
//! driver loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = widget.next_tick() => { widget.tick(); }
//!         line = input.next_line() => handle(&mut widget, line),
//!     }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;

use crate::alarm::{AlarmDispatcher, Player, Sound};
use crate::clock::ClockTick;
use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::timer::{RunState, Settings, SettingsStore, TimerEngine, TimerSnapshot};

pub struct TimerWidget {
    engine: TimerEngine,
    alarm: AlarmDispatcher,
    clock: Option<ClockTick>,
    updates: watch::Sender<TimerSnapshot>,
}

impl TimerWidget {
    pub fn new(engine: TimerEngine, alarm: AlarmDispatcher) -> Self {
        let (updates, _) = watch::channel(engine.snapshot());
        Self {
            engine,
            alarm,
            clock: None,
            updates,
        }
    }

    /// Build a widget from startup configuration.
    pub fn from_config(config: &Config, player: Arc<dyn Player>) -> Result<Self> {
        let settings = SettingsStore::new(config.timer.clone())?;
        let alarm = AlarmDispatcher::new(player, config.alarm_config());
        Ok(Self::new(TimerEngine::new(settings), alarm))
    }

    /// Change notifications; the receiver always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn alarm(&self) -> &AlarmDispatcher {
        &self.alarm
    }

    pub fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.settle();
        event
    }

    pub fn toggle(&mut self) -> Option<Event> {
        let event = self.engine.toggle();
        self.settle();
        event
    }

    pub fn reset(&mut self) -> Event {
        let event = self.engine.reset();
        self.settle();
        event
    }

    pub fn cycle_mode(&mut self) -> Event {
        let event = self.engine.cycle_mode();
        self.settle();
        event
    }

    pub fn apply_settings(&mut self, settings: Settings) -> Result<Event, ValidationError> {
        let event = self.engine.apply_settings(settings)?;
        self.settle();
        Ok(event)
    }

    /// Advance the countdown by one second. Triggers the alarm on completion.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        if matches!(event, Some(Event::TimerCompleted { .. })) {
            self.alarm.trigger();
        }
        self.settle();
        event
    }

    /// Wait for the next clock pulse. Never resolves while not running.
    pub async fn next_tick(&mut self) {
        match self.clock.as_mut() {
            Some(clock) => clock.tick().await,
            None => std::future::pending::<()>().await,
        }
    }

    // ── Alarm settings ───────────────────────────────────────────────

    pub fn select_sound(&mut self, id: &str) -> Result<bool, ValidationError> {
        self.alarm.select_sound(id)
    }

    pub fn add_custom_sound(&mut self, path: &Path) -> Result<Sound, ValidationError> {
        self.alarm.add_custom_sound(path)
    }

    pub fn set_alarm_duration(&mut self, secs: u64) {
        self.alarm.set_alarm_duration(secs);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn settle(&mut self) {
        let running = self.engine.run_state() == RunState::Running;
        match (running, self.clock.is_some()) {
            (true, false) => self.clock = Some(ClockTick::per_second()),
            (false, true) => {
                if let Some(clock) = self.clock.take() {
                    clock.cancel();
                }
            }
            _ => {}
        }
        self.updates.send_replace(self.engine.snapshot());
    }
}
