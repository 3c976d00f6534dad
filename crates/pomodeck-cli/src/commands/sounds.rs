use pomodeck_core::alarm::SoundLibrary;
use pomodeck_core::Config;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let library = SoundLibrary::default();
    if json {
        println!("{}", serde_json::to_string_pretty(library.sounds())?);
        return Ok(());
    }
    let selected = Config::load_or_default().alarm.sound;
    for sound in library.sounds() {
        let marker = if sound.id == selected { "*" } else { " " };
        println!("{marker} {:<12} {:<8} {}", sound.id, sound.name, sound.source);
    }
    Ok(())
}
