//! Alarm dispatcher.
//!
//! Two independent channels share one [`Player`]:
//!
//! - **alarm**: started on countdown completion, looped, force-stopped
//!   after the configured alarm duration. A new trigger stops the current
//!   alarm before starting again, so at most one alarm is ever audible.
//! - **preview**: started when the selected sound changes, plays for a
//!   fixed 3 seconds. A newer preview replaces an older one.
//!
//! Playback failures are logged and swallowed.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::player::{Playback, Player};
use super::sound::{Sound, SoundLibrary};
use crate::error::ValidationError;

pub const MIN_ALARM_SECS: u8 = 1;
pub const MAX_ALARM_SECS: u8 = 5;
pub const PREVIEW_DURATION: Duration = Duration::from_secs(3);

/// Selected sound and how long the alarm rings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmConfig {
    pub sound_id: String,
    duration_secs: u8,
}

impl AlarmConfig {
    pub fn new(sound_id: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            sound_id: sound_id.into(),
            duration_secs: clamp_alarm_secs(duration_secs),
        }
    }

    pub fn duration_secs(&self) -> u8 {
        self.duration_secs
    }

    pub fn set_duration_secs(&mut self, secs: u64) {
        self.duration_secs = clamp_alarm_secs(secs);
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::new("digital", u64::from(MAX_ALARM_SECS))
    }
}

pub fn clamp_alarm_secs(secs: u64) -> u8 {
    secs.clamp(u64::from(MIN_ALARM_SECS), u64::from(MAX_ALARM_SECS)) as u8
}

type Slot = Arc<Mutex<Option<Box<dyn Playback>>>>;

/// One playback at a time, with a timed stop.
#[derive(Default)]
struct Channel {
    slot: Slot,
    stopper: Option<JoinHandle<()>>,
}

impl Channel {
    fn stop(&mut self) {
        if let Some(stopper) = self.stopper.take() {
            stopper.abort();
        }
        clear(&self.slot);
    }

    fn is_active(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn play_for(
        &mut self,
        player: &dyn Player,
        sound: &Sound,
        looped: bool,
        duration: Duration,
        kind: &'static str,
    ) {
        self.stop();
        let playback = match player.play(&sound.source, looped) {
            Ok(playback) => playback,
            Err(e) => {
                tracing::warn!(kind, sound = %sound.id, error = %e, "audio playback failed");
                return;
            }
        };
        // Fresh slot per playback: a stale stopper can only clear its own.
        let slot: Slot = Arc::new(Mutex::new(Some(playback)));
        self.slot = Arc::clone(&slot);
        self.stopper = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            clear(&slot);
        }));
        tracing::debug!(kind, sound = %sound.id, ?duration, "playback started");
    }
}

fn clear(slot: &Slot) {
    let playback = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    drop(playback);
}

/// Plays the alarm on completion and previews newly selected sounds.
///
/// Must be used from within a tokio runtime; stops are scheduled as tasks.
pub struct AlarmDispatcher {
    player: Arc<dyn Player>,
    library: SoundLibrary,
    config: AlarmConfig,
    alarm: Channel,
    preview: Channel,
}

impl AlarmDispatcher {
    /// An unknown `config.sound_id` falls back to the first built-in sound.
    pub fn new(player: Arc<dyn Player>, config: AlarmConfig) -> Self {
        let library = SoundLibrary::default();
        let mut config = config;
        if library.get(&config.sound_id).is_none() {
            tracing::warn!(sound = %config.sound_id, "unknown alarm sound, using default");
            config.sound_id = library.first().id.clone();
        }
        Self {
            player,
            library,
            config,
            alarm: Channel::default(),
            preview: Channel::default(),
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn sounds(&self) -> &[Sound] {
        self.library.sounds()
    }

    pub fn selected_sound(&self) -> &Sound {
        self.library
            .get(&self.config.sound_id)
            .unwrap_or_else(|| self.library.first())
    }

    pub fn set_alarm_duration(&mut self, secs: u64) {
        self.config.set_duration_secs(secs);
    }

    /// Start the alarm. Fire-and-forget.
    pub fn trigger(&mut self) {
        let sound = self.selected_sound().clone();
        let duration = self.config.duration();
        self.alarm
            .play_for(self.player.as_ref(), &sound, true, duration, "alarm");
    }

    /// Change the selected sound. Previews it only when the selection changed.
    ///
    /// Returns whether a preview was started.
    pub fn select_sound(&mut self, id: &str) -> Result<bool, ValidationError> {
        let sound = self
            .library
            .get(id)
            .cloned()
            .ok_or_else(|| ValidationError::NotFound {
                kind: "sound".into(),
                id: id.into(),
            })?;
        if sound.id == self.config.sound_id {
            return Ok(false);
        }
        self.config.sound_id = sound.id.clone();
        self.preview(&sound);
        Ok(true)
    }

    /// Add a sound file to the in-memory library and select it.
    pub fn add_custom_sound(&mut self, path: &Path) -> Result<Sound, ValidationError> {
        let sound = self.library.add_custom(path)?.clone();
        self.config.sound_id = sound.id.clone();
        self.preview(&sound);
        Ok(sound)
    }

    pub fn is_alarm_playing(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn is_preview_playing(&self) -> bool {
        self.preview.is_active()
    }

    pub fn stop_all(&mut self) {
        self.alarm.stop();
        self.preview.stop();
    }

    fn preview(&mut self, sound: &Sound) {
        self.preview
            .play_for(self.player.as_ref(), sound, false, PREVIEW_DURATION, "preview");
    }
}

impl Drop for AlarmDispatcher {
    fn drop(&mut self) {
        self.stop_all();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingPlayer;
    use super::*;

    fn dispatcher(player: &RecordingPlayer) -> AlarmDispatcher {
        AlarmDispatcher::new(Arc::new(player.clone()), AlarmConfig::default())
    }

    #[test]
    fn alarm_duration_is_clamped() {
        assert_eq!(AlarmConfig::new("digital", 0).duration_secs(), 1);
        assert_eq!(AlarmConfig::new("digital", 9).duration_secs(), 5);
        let mut cfg = AlarmConfig::default();
        cfg.set_duration_secs(3);
        assert_eq!(cfg.duration_secs(), 3);
    }

    #[test]
    fn unknown_configured_sound_falls_back() {
        let player = RecordingPlayer::default();
        let d = AlarmDispatcher::new(Arc::new(player), AlarmConfig::new("kazoo", 5));
        assert_eq!(d.selected_sound().id, "digital");
    }

    #[tokio::test(start_paused = true)]
    async fn alarm_loops_and_stops_after_duration() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        d.set_alarm_duration(2);
        d.trigger();
        assert!(d.is_alarm_playing());
        assert!(player.started()[0].1, "alarm should loop");

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(d.is_alarm_playing());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!d.is_alarm_playing());
        assert_eq!(player.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_never_overlaps() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        d.trigger();
        tokio::time::sleep(Duration::from_secs(2)).await;
        d.trigger();
        assert_eq!(player.active(), 1);

        // The first alarm's stopper must not cut the second one short.
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(d.is_alarm_playing());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(player.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_same_sound_does_not_preview() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        assert!(!d.select_sound("digital").unwrap());
        assert!(player.started().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn preview_plays_three_seconds() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        d.set_alarm_duration(1);
        assert!(d.select_sound("bugle").unwrap());
        assert!(d.is_preview_playing());
        assert!(!player.started()[0].1, "preview should not loop");

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(d.is_preview_playing());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!d.is_preview_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_preview_replaces_older() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        d.select_sound("bugle").unwrap();
        d.select_sound("mechanical").unwrap();
        assert_eq!(player.active(), 1);
        assert_eq!(d.selected_sound().name, "Clock");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_sound_is_rejected() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        assert!(d.select_sound("kazoo").is_err());
        assert_eq!(d.selected_sound().id, "digital");
    }

    #[tokio::test(start_paused = true)]
    async fn playback_failure_is_swallowed() {
        let player = RecordingPlayer::failing();
        let mut d = dispatcher(&player);
        d.trigger();
        assert!(!d.is_alarm_playing());
        assert!(d.select_sound("bugle").unwrap());
        assert_eq!(d.selected_sound().id, "bugle");
    }

    #[tokio::test(start_paused = true)]
    async fn custom_sound_is_selected_and_previewed() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rain_on_window.mp3");
        std::fs::write(&path, b"ID3").unwrap();

        let sound = d.add_custom_sound(&path).unwrap();
        assert_eq!(sound.name, "rain_on_..");
        assert_eq!(d.selected_sound().id, sound.id);
        assert_eq!(player.started()[0].0, path.to_string_lossy().into_owned());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_custom_sound_keeps_selection() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        assert!(d.add_custom_sound(Path::new("/no/such/alarm.mp3")).is_err());
        assert_eq!(d.selected_sound().id, "digital");
        assert!(player.started().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_dispatcher_silences_everything() {
        let player = RecordingPlayer::default();
        let mut d = dispatcher(&player);
        d.trigger();
        d.select_sound("bugle").unwrap();
        assert_eq!(player.active(), 2);
        drop(d);
        assert_eq!(player.active(), 0);
    }
}
