//! Audio playback seam.
//!
//! The dispatcher only knows [`Player`]; dropping the returned
//! [`Playback`] must stop the sound.

use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// An in-progress playback. Dropping it stops the sound.
pub trait Playback: Send {}

/// Something that can start playing a sound source.
pub trait Player: Send + Sync {
    fn play(&self, source: &str, looped: bool) -> Result<Box<dyn Playback>, PlaybackError>;
}

/// External program used by [`CommandPlayer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommand {
    pub program: String,
    /// Arguments placed before the source.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra arguments added when the sound should loop.
    #[serde(default)]
    pub loop_args: Vec<String>,
}

impl Default for PlayerCommand {
    fn default() -> Self {
        Self {
            program: "ffplay".into(),
            args: vec![
                "-nodisp".into(),
                "-autoexit".into(),
                "-loglevel".into(),
                "quiet".into(),
            ],
            loop_args: vec!["-loop".into(), "0".into()],
        }
    }
}

/// Plays sounds by spawning an external audio program.
#[derive(Debug, Clone, Default)]
pub struct CommandPlayer {
    command: PlayerCommand,
}

impl CommandPlayer {
    pub fn new(command: PlayerCommand) -> Self {
        Self { command }
    }
}

impl Player for CommandPlayer {
    fn play(&self, source: &str, looped: bool) -> Result<Box<dyn Playback>, PlaybackError> {
        if source.trim().is_empty() {
            return Err(PlaybackError::Unsupported(source.to_string()));
        }
        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args);
        if looped {
            cmd.args(&self.command.loop_args);
        }
        let child = cmd
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;
        Ok(Box::new(ChildPlayback { child }))
    }
}

/// Plays nothing. For headless runs and `--silent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

struct Silence;

impl Playback for Silence {}

impl Player for NullPlayer {
    fn play(&self, _source: &str, _looped: bool) -> Result<Box<dyn Playback>, PlaybackError> {
        Ok(Box::new(Silence))
    }
}

struct ChildPlayback {
    child: Child,
}

impl Playback for ChildPlayback {}

impl Drop for ChildPlayback {
    fn drop(&mut self) {
        // The program may already have exited on its own.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
