mod dispatcher;
mod player;
mod sound;

pub use dispatcher::{
    clamp_alarm_secs, AlarmConfig, AlarmDispatcher, MAX_ALARM_SECS, MIN_ALARM_SECS,
    PREVIEW_DURATION,
};
pub use player::{CommandPlayer, NullPlayer, Playback, Player, PlayerCommand};
pub use sound::{default_sounds, short_name, Sound, SoundLibrary};

#[cfg(test)]
pub(crate) use dispatcher::testing;
