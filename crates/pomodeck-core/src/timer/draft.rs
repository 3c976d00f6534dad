//! Editable copy of the settings behind the settings panel's clock picker.
//!
//! Nothing reaches the [`SettingsStore`](super::SettingsStore) until
//! [`SettingsDraft::commit`] validates the edited values.

use super::mode::Mode;
use super::settings::Settings;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    settings: Settings,
    active: Mode,
}

impl SettingsDraft {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            active: Mode::Focus,
        }
    }

    pub fn active(&self) -> Mode {
        self.active
    }

    pub fn select(&mut self, mode: Mode) {
        self.active = mode;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Active duration as whole `(hours, minutes)`.
    pub fn display(&self) -> (u64, u64) {
        let hours = self.settings.hours(self.active);
        let total_minutes = if hours.is_finite() && hours > 0.0 {
            (hours * 60.0).round() as u64
        } else {
            0
        };
        (total_minutes / 60, total_minutes % 60)
    }

    /// Minute increment used by the picker arrows for the active tab.
    pub fn minute_step(&self) -> i64 {
        if self.active == Mode::Focus {
            5
        } else {
            1
        }
    }

    pub fn adjust_hours(&mut self, delta: i64) {
        let (h, m) = self.display();
        let h = (h as i64 + delta).max(0);
        self.store(h, m as i64);
    }

    /// Minutes carry into hours at 60 and borrow below 0, bottoming out at 0:00.
    pub fn adjust_minutes(&mut self, delta: i64) {
        let (h, m) = self.display();
        let mut h = h as i64;
        let mut m = m as i64 + delta;
        if m >= 60 {
            h += m / 60;
            m %= 60;
        } else if m < 0 {
            if h > 0 {
                let borrow = (-m + 59) / 60;
                if borrow > h {
                    h = 0;
                    m = 0;
                } else {
                    h -= borrow;
                    m += borrow * 60;
                }
            } else {
                m = 0;
            }
        }
        self.store(h, m);
    }

    fn store(&mut self, hours: i64, minutes: i64) {
        let value = hours as f64 + minutes as f64 / 60.0;
        self.settings.set_hours(self.active, value);
    }

    /// Validate and hand back the edited settings.
    pub fn commit(self) -> Result<Settings, ValidationError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_splits_hours_and_minutes() {
        let mut draft = SettingsDraft::new(Settings {
            focus_hours: 1.5,
            ..Settings::default()
        });
        assert_eq!(draft.display(), (1, 30));
        draft.select(Mode::ShortBreak);
        assert_eq!(draft.display(), (0, 6));
    }

    #[test]
    fn minute_step_depends_on_tab() {
        let mut draft = SettingsDraft::new(Settings::default());
        assert_eq!(draft.minute_step(), 5);
        draft.select(Mode::LongBreak);
        assert_eq!(draft.minute_step(), 1);
    }

    #[test]
    fn minutes_carry_into_hours() {
        let mut draft = SettingsDraft::new(Settings {
            focus_hours: 55.0 / 60.0,
            ..Settings::default()
        });
        draft.adjust_minutes(5);
        assert_eq!(draft.display(), (1, 0));
        draft.adjust_minutes(5);
        assert_eq!(draft.display(), (1, 5));
    }

    #[test]
    fn minutes_borrow_from_hours() {
        let mut draft = SettingsDraft::new(Settings {
            focus_hours: 1.0,
            ..Settings::default()
        });
        draft.adjust_minutes(-5);
        assert_eq!(draft.display(), (0, 55));
    }

    #[test]
    fn minutes_clamp_at_zero_without_hours() {
        let mut draft = SettingsDraft::new(Settings::default());
        draft.select(Mode::ShortBreak);
        draft.adjust_minutes(-10);
        assert_eq!(draft.display(), (0, 0));
    }

    #[test]
    fn hours_clamp_at_zero() {
        let mut draft = SettingsDraft::new(Settings::default());
        draft.adjust_hours(-3);
        assert_eq!(draft.display(), (0, 30));
        draft.adjust_hours(2);
        assert_eq!(draft.display(), (2, 30));
    }

    #[test]
    fn commit_rejects_zero_duration() {
        let mut draft = SettingsDraft::new(Settings::default());
        draft.select(Mode::ShortBreak);
        draft.adjust_minutes(-6);
        assert_eq!(draft.display(), (0, 0));
        assert!(draft.commit().is_err());
    }

    #[test]
    fn commit_returns_edited_settings() {
        let mut draft = SettingsDraft::new(Settings::default());
        draft.adjust_minutes(15);
        let settings = draft.commit().unwrap();
        assert!((settings.focus_hours - 0.75).abs() < 1e-9);
    }
}
