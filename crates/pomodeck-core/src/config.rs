//! TOML-based startup configuration.
//!
//! Holds the defaults the widget starts with:
//! - Timer durations and auto-start flags
//! - Alarm sound, alarm duration and the audio player command
//! - Wallpaper, wallpaper position and bezel color
//! - AI service endpoint, models and API key
//!
//! Configuration is stored at `~/.config/pomodeck/config.toml`. The widget
//! never writes runtime changes back; only `pomodeck config` does.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ai::AiConfig;
use crate::alarm::{AlarmConfig, PlayerCommand, MAX_ALARM_SECS, MIN_ALARM_SECS};
use crate::appearance::{Appearance, BackgroundPosition, DEFAULT_BEZEL, DEFAULT_WALLPAPER};
use crate::error::ConfigError;
use crate::timer::Settings;

/// Alarm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSection {
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_alarm_secs")]
    pub duration_secs: u64,
    #[serde(default)]
    pub player: PlayerCommand,
}

/// Appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSection {
    #[serde(default = "default_wallpaper")]
    pub wallpaper: String,
    #[serde(default = "default_bezel")]
    pub bezel: String,
    #[serde(default = "default_50")]
    pub position_x: f64,
    #[serde(default = "default_50")]
    pub position_y: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomodeck/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: Settings,
    #[serde(default)]
    pub alarm: AlarmSection,
    #[serde(default)]
    pub appearance: AppearanceSection,
    #[serde(default)]
    pub ai: AiConfig,
}

// Default functions
fn default_sound() -> String {
    "digital".into()
}
fn default_alarm_secs() -> u64 {
    u64::from(MAX_ALARM_SECS)
}
fn default_wallpaper() -> String {
    DEFAULT_WALLPAPER.into()
}
fn default_bezel() -> String {
    DEFAULT_BEZEL.into()
}
fn default_50() -> f64 {
    50.0
}

impl Default for AlarmSection {
    fn default() -> Self {
        Self {
            sound: default_sound(),
            duration_secs: default_alarm_secs(),
            player: PlayerCommand::default(),
        }
    }
}

impl Default for AppearanceSection {
    fn default() -> Self {
        Self {
            wallpaper: default_wallpaper(),
            bezel: default_bezel(),
            position_x: 50.0,
            position_y: 50.0,
        }
    }
}

/// Returns `~/.config/pomodeck[-dev]/` based on POMODECK_ENV.
///
/// Set POMODECK_ENV=dev to use the development config directory.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::DirUnavailable("no home directory".into()))?
        .join(".config");

    let env = std::env::var("POMODECK_ENV").unwrap_or_else(|_| "production".to_string());

    Ok(if env == "dev" {
        base_dir.join("pomodeck-dev")
    } else {
        base_dir.join("pomodeck")
    })
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if no file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The result must still validate;
    /// on error `self` is unchanged. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer.validate().map_err(|e| ConfigError::InvalidValue {
            key: "timer".into(),
            message: e.to_string(),
        })?;

        let secs = self.alarm.duration_secs;
        if !(u64::from(MIN_ALARM_SECS)..=u64::from(MAX_ALARM_SECS)).contains(&secs) {
            return Err(ConfigError::InvalidValue {
                key: "alarm.duration_secs".into(),
                message: format!("must be between {MIN_ALARM_SECS} and {MAX_ALARM_SECS}, got {secs}"),
            });
        }

        self.appearance().map_err(|e| ConfigError::InvalidValue {
            key: "appearance".into(),
            message: e.to_string(),
        })?;

        url::Url::parse(&self.ai.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "ai.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn alarm_config(&self) -> AlarmConfig {
        AlarmConfig::new(self.alarm.sound.clone(), self.alarm.duration_secs)
    }

    pub fn appearance(&self) -> Result<Appearance, crate::error::ValidationError> {
        let mut appearance = Appearance {
            position: BackgroundPosition::new(
                self.appearance.position_x,
                self.appearance.position_y,
            ),
            ..Appearance::default()
        };
        appearance.set_background(&self.appearance.wallpaper)?;
        appearance.set_bezel(&self.appearance.bezel)?;
        Ok(appearance)
    }
}
