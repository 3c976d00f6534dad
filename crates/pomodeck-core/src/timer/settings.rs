//! Timer settings and the store that owns them.
//!
//! Durations are kept in fractional hours, the unit the settings panel and
//! the AI service speak. Conversion to whole seconds happens once, via
//! [`hours_to_secs`], and everything downstream compares seconds.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::error::ValidationError;

/// User-configured durations and auto-start policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_hours")]
    pub focus_hours: f64,
    #[serde(default = "default_short_break_hours")]
    pub short_break_hours: f64,
    #[serde(default = "default_long_break_hours")]
    pub long_break_hours: f64,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
}

fn default_focus_hours() -> f64 {
    0.5
}
fn default_short_break_hours() -> f64 {
    0.1
}
fn default_long_break_hours() -> f64 {
    0.25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_hours: default_focus_hours(),
            short_break_hours: default_short_break_hours(),
            long_break_hours: default_long_break_hours(),
            auto_start_breaks: false,
            auto_start_focus: false,
        }
    }
}

impl Settings {
    pub fn hours(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Focus => self.focus_hours,
            Mode::ShortBreak => self.short_break_hours,
            Mode::LongBreak => self.long_break_hours,
        }
    }

    pub fn set_hours(&mut self, mode: Mode, hours: f64) {
        match mode {
            Mode::Focus => self.focus_hours = hours,
            Mode::ShortBreak => self.short_break_hours = hours,
            Mode::LongBreak => self.long_break_hours = hours,
        }
    }

    pub fn duration_secs(&self, mode: Mode) -> u64 {
        hours_to_secs(self.hours(mode))
    }

    /// Auto-start flag that applies when `mode` is entered automatically.
    pub fn auto_start(&self, mode: Mode) -> bool {
        if mode.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_focus
        }
    }

    /// Every duration must be finite and round to at least one second.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for mode in Mode::ALL {
            let hours = self.hours(mode);
            if !hours.is_finite() || hours <= 0.0 {
                return Err(ValidationError::invalid(
                    field_name(mode),
                    format!("duration must be a positive number of hours, got {hours}"),
                ));
            }
            if hours_to_secs(hours) == 0 {
                return Err(ValidationError::invalid(
                    field_name(mode),
                    "duration must be at least one second",
                ));
            }
        }
        Ok(())
    }
}

fn field_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "focus_hours",
        Mode::ShortBreak => "short_break_hours",
        Mode::LongBreak => "long_break_hours",
    }
}

/// `round(hours * 3600)` as whole seconds. Non-finite or negative input maps to 0.
pub fn hours_to_secs(hours: f64) -> u64 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    (hours * 3600.0).round() as u64
}

/// Holds the current [`Settings`]. Input is validated on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Rejected input leaves the store unchanged.
    pub fn apply(&mut self, settings: Settings) -> Result<(), ValidationError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn duration_secs(&self, mode: Mode) -> u64 {
        self.settings.duration_secs(mode)
    }

    pub fn auto_start(&self, mode: Mode) -> bool {
        self.settings.auto_start(mode)
    }
}
