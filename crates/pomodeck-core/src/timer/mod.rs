mod draft;
mod engine;
mod mode;
mod settings;

pub use draft::SettingsDraft;
pub use engine::{TimerEngine, TimerSnapshot};
pub use mode::{format_time, Mode, RunState};
pub use settings::{hours_to_secs, Settings, SettingsStore};
