use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A selectable alarm sound. `source` is a URL or a local file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub id: String,
    pub name: String,
    pub source: String,
}

impl Sound {
    fn builtin(id: &str, name: &str, source: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.starts_with("custom-")
    }
}

/// Built-in sounds. The first one is the default selection.
pub fn default_sounds() -> Vec<Sound> {
    vec![
        Sound::builtin(
            "digital",
            "Digital",
            "https://actions.google.com/sounds/v1/alarms/digital_watch_alarm_long.ogg",
        ),
        Sound::builtin(
            "mechanical",
            "Clock",
            "https://actions.google.com/sounds/v1/alarms/mechanical_clock_ring.ogg",
        ),
        Sound::builtin(
            "bugle",
            "Bugle",
            "https://actions.google.com/sounds/v1/alarms/bugle_tune.ogg",
        ),
    ]
}

/// In-memory list of sounds. Nothing here touches the disk.
#[derive(Debug, Clone)]
pub struct SoundLibrary {
    sounds: Vec<Sound>,
}

impl Default for SoundLibrary {
    fn default() -> Self {
        Self {
            sounds: default_sounds(),
        }
    }
}

impl SoundLibrary {
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn get(&self, id: &str) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn first(&self) -> &Sound {
        // The built-ins are always present.
        &self.sounds[0]
    }

    /// Register a user-provided sound file and return its new id.
    pub fn add_custom(&mut self, path: &Path) -> Result<&Sound, ValidationError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ValidationError::invalid("sound", format!("not a file: {}", path.display()))
            })?;
        if !path.is_file() {
            return Err(ValidationError::invalid(
                "sound",
                format!("no such file: {}", path.display()),
            ));
        }
        let sound = Sound {
            id: format!("custom-{}", uuid::Uuid::new_v4()),
            name: short_name(stem),
            source: path.to_string_lossy().into_owned(),
        };
        self.sounds.push(sound);
        Ok(&self.sounds[self.sounds.len() - 1])
    }
}

/// Names over 10 characters become the first 8 plus `..`.
pub fn short_name(stem: &str) -> String {
    if stem.chars().count() > 10 {
        let head: String = stem.chars().take(8).collect();
        format!("{head}..")
    } else {
        stem.to_string()
    }
}
