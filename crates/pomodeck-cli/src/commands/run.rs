use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use pomodeck_core::{
    AiClient, AiError, AiRecommendation, Appearance, CommandPlayer, Config, Event,
    GeneratedImage, Mode, NullPlayer, Player, SettingsDraft, TimerWidget,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Args)]
pub struct RunArgs {
    /// Do not play any sounds
    #[arg(long)]
    pub silent: bool,
    /// Override the audio player program (e.g. "mpv")
    #[arg(long)]
    pub player: Option<String>,
    /// Start counting down immediately
    #[arg(long)]
    pub start: bool,
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Toggle,
    Start,
    Reset,
    Mode,
    Status,
    Sounds,
    Sound(String),
    AddSound(PathBuf),
    Alarm(u64),
    Set(Mode, f64),
    AdjustHours(Mode, i64),
    AdjustMinutes(Mode, i64),
    Auto(AutoTarget, bool),
    Bezel(String),
    Wallpaper(String),
    UploadWallpaper(PathBuf),
    Position(f64, f64),
    Recommend(String),
    Theme(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoTarget {
    Breaks,
    Focus,
}

const HELP: &str = "\
commands:
  t, toggle              start or pause
  s, start               start
  r, reset               stop and refill the current mode
  m, mode                switch to the next mode
  status                 show the timer
  sounds                 list alarm sounds
  sound <id>             select (and preview) an alarm sound
  sound add <path>       add a custom alarm sound
  alarm <secs>           alarm length, 1-5 seconds
  set <mode> <hours>     set a mode duration
  adjust <mode> h|m <n>  nudge a mode duration by hours or minute steps
  auto breaks|focus on|off
  bezel <color>          bezel color or 'transparent'
  wallpaper <value>      color, 'transparent' or image URL
  wallpaper upload <path> use a local photo as the wallpaper
  position <x> <y>       wallpaper focal point in percent
  ai <task>              suggest durations for a task
  theme <description>    generate a wallpaper
  q, quit                exit";

impl Input {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let input = match (head, args.as_slice()) {
            ("t" | "toggle", []) => Input::Toggle,
            ("s" | "start", []) => Input::Start,
            ("r" | "reset", []) => Input::Reset,
            ("m" | "mode", []) => Input::Mode,
            ("status", []) => Input::Status,
            ("sounds", []) => Input::Sounds,
            ("sound", ["add", ..]) => {
                let path = rest["add".len()..].trim();
                if path.is_empty() {
                    return Err("usage: sound add <path>".into());
                }
                Input::AddSound(PathBuf::from(path))
            }
            ("sound", [id]) => Input::Sound(id.to_string()),
            ("alarm", [secs]) => Input::Alarm(parse_num(secs)?),
            ("set", [mode, hours]) => Input::Set(mode.parse()?, parse_num(hours)?),
            ("adjust", [mode, "h", n]) => Input::AdjustHours(mode.parse()?, parse_num(n)?),
            ("adjust", [mode, "m", n]) => Input::AdjustMinutes(mode.parse()?, parse_num(n)?),
            ("auto", [target, flag]) => {
                let target = match *target {
                    "breaks" => AutoTarget::Breaks,
                    "focus" => AutoTarget::Focus,
                    other => return Err(format!("unknown auto-start target: {other}")),
                };
                let on = match *flag {
                    "on" => true,
                    "off" => false,
                    other => return Err(format!("expected on/off, got {other}")),
                };
                Input::Auto(target, on)
            }
            ("bezel", [value]) => Input::Bezel(value.to_string()),
            ("wallpaper", ["upload", ..]) => {
                let path = rest["upload".len()..].trim();
                if path.is_empty() {
                    return Err("usage: wallpaper upload <path>".into());
                }
                Input::UploadWallpaper(PathBuf::from(path))
            }
            ("wallpaper", [_, ..]) => Input::Wallpaper(rest.to_string()),
            ("position", [x, y]) => Input::Position(parse_num(x)?, parse_num(y)?),
            ("ai", [_, ..]) => Input::Recommend(rest.to_string()),
            ("theme", [_, ..]) => Input::Theme(rest.to_string()),
            ("help" | "?", []) => Input::Help,
            ("q" | "quit" | "exit", []) => Input::Quit,
            _ => return Err(format!("unrecognised command: {line} (try 'help')")),
        };
        Ok(input)
    }
}

fn parse_num<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("invalid number: {s}"))
}

enum AiOutcome {
    Recommendation(Result<AiRecommendation, AiError>),
    Background(Result<GeneratedImage, AiError>),
}

struct Session {
    widget: TimerWidget,
    appearance: Appearance,
    ai: Option<Arc<AiClient>>,
    ai_tx: mpsc::UnboundedSender<AiOutcome>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let start = args.start;
    let player: Arc<dyn Player> = if args.silent {
        Arc::new(NullPlayer)
    } else {
        let mut command = config.alarm.player.clone();
        if let Some(program) = args.player {
            command.program = program;
        }
        Arc::new(CommandPlayer::new(command))
    };

    super::runtime()?.block_on(async move {
        let widget = TimerWidget::from_config(&config, player)?;
        let ai = match AiClient::new(config.ai.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::debug!(error = %e, "AI features disabled");
                None
            }
        };
        let (ai_tx, ai_rx) = mpsc::unbounded_channel();
        let session = Session {
            widget,
            appearance: config.appearance()?,
            ai,
            ai_tx,
        };
        session.drive(start, ai_rx).await
    })
}

impl Session {
    async fn drive(
        mut self,
        start: bool,
        mut ai_rx: mpsc::UnboundedReceiver<AiOutcome>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut updates = self.widget.subscribe();

        print_status(&self.widget);
        if start {
            self.widget.start();
        }

        loop {
            tokio::select! {
                _ = self.widget.next_tick() => {
                    if let Some(Event::TimerCompleted { completed_mode, next_mode, auto_started, .. }) = self.widget.tick() {
                        println!(
                            "{} finished -> {}{}",
                            completed_mode.label(),
                            next_mode.label(),
                            if auto_started { " (auto-started)" } else { "" }
                        );
                    }
                }
                Ok(()) = updates.changed() => print_status(&self.widget),
                Some(outcome) = ai_rx.recv() => self.on_ai(outcome),
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Input::parse(&line) {
                        Ok(Input::Quit) => break,
                        Ok(input) => {
                            if let Err(e) = self.handle(input) {
                                println!("error: {e}");
                            }
                        }
                        Err(e) => println!("{e}"),
                    }
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, input: Input) -> Result<(), Box<dyn std::error::Error>> {
        match input {
            Input::Toggle => {
                self.widget.toggle();
            }
            Input::Start => {
                self.widget.start();
            }
            Input::Reset => {
                self.widget.reset();
            }
            Input::Mode => {
                self.widget.cycle_mode();
            }
            Input::Status => print_status(&self.widget),
            Input::Sounds => {
                let selected = &self.widget.alarm().config().sound_id;
                for sound in self.widget.alarm().sounds() {
                    let marker = if &sound.id == selected { "*" } else { " " };
                    println!("{marker} {:<12} {}", sound.id, sound.name);
                }
            }
            Input::Sound(id) => {
                if !self.widget.select_sound(&id)? {
                    println!("{id} already selected");
                }
            }
            Input::AddSound(path) => {
                let sound = self.widget.add_custom_sound(&path)?;
                println!("added {} ({})", sound.name, sound.id);
            }
            Input::Alarm(secs) => {
                self.widget.set_alarm_duration(secs);
                println!(
                    "alarm plays for {}s",
                    self.widget.alarm().config().duration_secs()
                );
            }
            Input::Set(mode, hours) => {
                let mut settings = self.widget.engine().settings().clone();
                settings.set_hours(mode, hours);
                self.apply(settings)?;
            }
            Input::AdjustHours(mode, n) => {
                let mut draft = self.draft(mode);
                draft.adjust_hours(n);
                self.commit(draft)?;
            }
            Input::AdjustMinutes(mode, n) => {
                let mut draft = self.draft(mode);
                draft.adjust_minutes(n * draft.minute_step());
                self.commit(draft)?;
            }
            Input::Auto(target, on) => {
                let mut settings = self.widget.engine().settings().clone();
                match target {
                    AutoTarget::Breaks => settings.auto_start_breaks = on,
                    AutoTarget::Focus => settings.auto_start_focus = on,
                }
                self.apply(settings)?;
            }
            Input::Bezel(value) => {
                self.appearance.set_bezel(&value)?;
                println!("bezel: {}", self.appearance.bezel_label());
            }
            Input::Wallpaper(value) => {
                self.appearance.set_background(&value)?;
                print_wallpaper(&self.appearance);
            }
            Input::UploadWallpaper(path) => {
                self.appearance.upload_wallpaper(&path)?;
                print_wallpaper(&self.appearance);
            }
            Input::Position(x, y) => {
                self.appearance.set_position(x, y);
                let p = self.appearance.position;
                println!("wallpaper position: {:.0}% {:.0}%", p.x, p.y);
            }
            Input::Recommend(task) => {
                let client = self.ai_client()?;
                let tx = self.ai_tx.clone();
                println!("thinking...");
                tokio::spawn(async move {
                    let _ = tx.send(AiOutcome::Recommendation(client.recommend(&task).await));
                });
            }
            Input::Theme(prompt) => {
                let client = self.ai_client()?;
                let tx = self.ai_tx.clone();
                println!("generating wallpaper...");
                tokio::spawn(async move {
                    let _ = tx.send(AiOutcome::Background(
                        client.generate_background(&prompt).await,
                    ));
                });
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => {}
        }
        Ok(())
    }

    fn on_ai(&mut self, outcome: AiOutcome) {
        match outcome {
            AiOutcome::Recommendation(Ok(rec)) => {
                let settings = rec.settings(self.widget.engine().settings());
                match self.apply(settings) {
                    Ok(()) => {
                        println!("{}", rec.reasoning);
                        println!("theme idea: {}", rec.theme_description);
                    }
                    Err(e) => println!("error: {e}"),
                }
            }
            AiOutcome::Background(Ok(image)) => {
                self.appearance.background = pomodeck_core::Background::Image(image.data_uri());
                print_wallpaper(&self.appearance);
            }
            AiOutcome::Recommendation(Err(e)) | AiOutcome::Background(Err(e)) => {
                println!("error: {e}");
            }
        }
    }

    fn ai_client(&self) -> Result<Arc<AiClient>, AiError> {
        self.ai.clone().ok_or(AiError::MissingApiKey)
    }

    fn draft(&self, mode: Mode) -> SettingsDraft {
        let mut draft = SettingsDraft::new(self.widget.engine().settings().clone());
        draft.select(mode);
        draft
    }

    fn commit(&mut self, draft: SettingsDraft) -> Result<(), Box<dyn std::error::Error>> {
        let mode = draft.active();
        let (h, m) = draft.display();
        self.apply(draft.commit()?)?;
        println!("{}: {h}h {m:02}m", mode.label());
        Ok(())
    }

    fn apply(&mut self, settings: pomodeck_core::Settings) -> Result<(), Box<dyn std::error::Error>> {
        if let Event::SettingsApplied { resynced: false, .. } = self.widget.apply_settings(settings)? {
            println!("settings saved; they apply from the next countdown");
        }
        Ok(())
    }
}

fn print_status(widget: &TimerWidget) {
    let snap = widget.snapshot();
    let state = match snap.run_state {
        pomodeck_core::RunState::Running => "running",
        pomodeck_core::RunState::Paused => "paused",
        pomodeck_core::RunState::Stopped => "stopped",
    };
    println!("[{:<5}] {}  {state}", snap.mode.label(), snap.display());
}

fn print_wallpaper(appearance: &Appearance) {
    match &appearance.background {
        pomodeck_core::Background::Image(src) if src.starts_with("data:") => {
            println!("wallpaper: generated image ({} bytes)", src.len())
        }
        pomodeck_core::Background::Image(src) => println!("wallpaper: {src}"),
        other => println!("wallpaper: {}", other.hex_field()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(Input::parse("t").unwrap(), Input::Toggle);
        assert_eq!(Input::parse(" toggle ").unwrap(), Input::Toggle);
        assert_eq!(Input::parse("m").unwrap(), Input::Mode);
        assert_eq!(Input::parse("quit").unwrap(), Input::Quit);
    }

    #[test]
    fn parses_settings_commands() {
        assert_eq!(
            Input::parse("set short 0.2").unwrap(),
            Input::Set(Mode::ShortBreak, 0.2)
        );
        assert_eq!(
            Input::parse("adjust focus m -2").unwrap(),
            Input::AdjustMinutes(Mode::Focus, -2)
        );
        assert_eq!(
            Input::parse("auto breaks on").unwrap(),
            Input::Auto(AutoTarget::Breaks, true)
        );
        assert!(Input::parse("auto breaks maybe").is_err());
        assert!(Input::parse("set focus soon").is_err());
    }

    #[test]
    fn free_text_arguments_are_kept_whole() {
        assert_eq!(
            Input::parse("ai write my thesis chapter").unwrap(),
            Input::Recommend("write my thesis chapter".into())
        );
        assert_eq!(
            Input::parse("sound add /tmp/my alarm.mp3").unwrap(),
            Input::AddSound(PathBuf::from("/tmp/my alarm.mp3"))
        );
        assert_eq!(Input::parse("sound bugle").unwrap(), Input::Sound("bugle".into()));
        assert_eq!(
            Input::parse("wallpaper upload ~/Pictures/sea view.png").unwrap(),
            Input::UploadWallpaper(PathBuf::from("~/Pictures/sea view.png"))
        );
        assert_eq!(
            Input::parse("wallpaper #172554").unwrap(),
            Input::Wallpaper("#172554".into())
        );
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(Input::parse("dance").is_err());
        assert!(Input::parse("toggle now").is_err());
        assert!(Input::parse("sound add").is_err());
        assert!(Input::parse("wallpaper upload").is_err());
    }
}
