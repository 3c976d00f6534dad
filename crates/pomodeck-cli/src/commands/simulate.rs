use clap::Args;
use pomodeck_core::{Config, Event, Mode, RunState, SettingsStore, TimerEngine};
use serde::Serialize;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of one-second ticks to deliver
    #[arg(long, default_value_t = 0)]
    pub ticks: u64,
    /// Toggle the timer before ticking
    #[arg(long)]
    pub toggle_first: bool,
    /// Cycle the mode this many times before starting
    #[arg(long, default_value_t = 0)]
    pub cycle: u32,
    /// Focus duration in hours
    #[arg(long)]
    pub focus: Option<f64>,
    /// Short break duration in hours
    #[arg(long)]
    pub short: Option<f64>,
    /// Long break duration in hours
    #[arg(long)]
    pub long: Option<f64>,
    /// Auto-start breaks after a focus session
    #[arg(long)]
    pub auto_breaks: Option<bool>,
    /// Auto-start focus after a break
    #[arg(long)]
    pub auto_focus: Option<bool>,
    /// Print every event as it happens
    #[arg(long)]
    pub events: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    mode: Mode,
    run_state: RunState,
    time_left_secs: u64,
    display: String,
    completions: u32,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Config::load_or_default().timer;
    if let Some(h) = args.focus {
        settings.set_hours(Mode::Focus, h);
    }
    if let Some(h) = args.short {
        settings.set_hours(Mode::ShortBreak, h);
    }
    if let Some(h) = args.long {
        settings.set_hours(Mode::LongBreak, h);
    }
    if let Some(on) = args.auto_breaks {
        settings.auto_start_breaks = on;
    }
    if let Some(on) = args.auto_focus {
        settings.auto_start_focus = on;
    }

    let mut engine = TimerEngine::new(SettingsStore::new(settings)?);
    let mut events = Vec::new();
    for _ in 0..args.cycle {
        events.push(engine.cycle_mode());
    }
    if args.toggle_first {
        events.extend(engine.toggle());
    }

    let mut completions = 0;
    for _ in 0..args.ticks {
        if let Some(event) = engine.tick() {
            if matches!(event, Event::TimerCompleted { .. }) {
                completions += 1;
            }
            events.push(event);
        }
    }

    if args.events {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    let snap = engine.snapshot();
    let report = SimulationReport {
        mode: snap.mode,
        run_state: snap.run_state,
        time_left_secs: snap.time_left_secs,
        display: snap.display(),
        completions,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
