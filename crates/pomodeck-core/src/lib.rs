//! # Pomodeck Core Library
//!
//! Core logic for the Pomodeck Pomodoro widget. The `pomodeck` CLI is a
//! thin front-end over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven mode/run-state machine with the
//!   auto-transition policy applied atomically on completion
//! - **Clock**: the one-second tick source, alive only while running
//! - **Alarm**: sound library, playback seam and the alarm dispatcher
//! - **Widget**: wires engine, clock and alarm together and publishes
//!   snapshot updates
//! - **Appearance**: wallpaper and bezel theming
//! - **AI**: client for duration recommendations and generated wallpapers
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerWidget`]: Runtime wrapper driven by user input and the clock
//! - [`AlarmDispatcher`]: Alarm and preview playback
//! - [`Config`]: Startup configuration

pub mod ai;
pub mod alarm;
pub mod appearance;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod timer;
pub mod widget;

pub use ai::{AiClient, AiConfig, AiRecommendation, GeneratedImage};
pub use alarm::{AlarmConfig, AlarmDispatcher, CommandPlayer, NullPlayer, Player, Sound};
pub use appearance::{Appearance, Background};
pub use clock::ClockTick;
pub use config::Config;
pub use error::{AiError, ConfigError, CoreError, PlaybackError, ValidationError};
pub use events::Event;
pub use timer::{
    format_time, Mode, RunState, Settings, SettingsDraft, SettingsStore, TimerEngine,
    TimerSnapshot,
};
pub use widget::TimerWidget;
