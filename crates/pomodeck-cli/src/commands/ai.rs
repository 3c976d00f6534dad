use std::path::{Path, PathBuf};

use clap::Subcommand;
use pomodeck_core::{AiClient, Config, GeneratedImage};

#[derive(Subcommand)]
pub enum AiAction {
    /// Suggest focus and break durations for a task
    Recommend {
        /// What you are about to work on
        task: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate an abstract 16:9 wallpaper
    Background {
        /// Theme description
        prompt: String,
        /// Write the image to this file, or into this directory as
        /// `wallpaper.<ext>`, instead of printing a data URI
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(action: AiAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = AiClient::new(config.ai.clone())?;
    let rt = super::runtime()?;

    match action {
        AiAction::Recommend { task, json } => {
            let rec = rt.block_on(client.recommend(&task))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                let settings = rec.settings(&config.timer);
                println!(
                    "focus {:.2}h  short {:.2}h  long {:.2}h",
                    settings.focus_hours, settings.short_break_hours, settings.long_break_hours
                );
                println!("{}", rec.reasoning);
                println!("theme: {}", rec.theme_description);
            }
        }
        AiAction::Background { prompt, out } => {
            let image = rt.block_on(client.generate_background(&prompt))?;
            match out {
                Some(out) => {
                    let path = output_path(&out, &image);
                    let bytes = image.decode()?;
                    std::fs::write(&path, &bytes)?;
                    println!("wrote {} ({} bytes)", path.display(), bytes.len());
                }
                None => println!("{}", image.data_uri()),
            }
        }
    }
    Ok(())
}

fn output_path(out: &Path, image: &GeneratedImage) -> PathBuf {
    if out.is_dir() {
        out.join(format!("wallpaper.{}", image.extension()))
    } else {
        out.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime_type: &str) -> GeneratedImage {
        GeneratedImage {
            mime_type: mime_type.into(),
            data: String::new(),
        }
    }

    #[test]
    fn directory_output_is_named_by_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            output_path(dir.path(), &image("image/jpeg")),
            dir.path().join("wallpaper.jpg")
        );
        assert_eq!(
            output_path(dir.path(), &image("image/png")),
            dir.path().join("wallpaper.png")
        );
    }

    #[test]
    fn file_output_is_used_as_given() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.img");
        assert_eq!(output_path(&file, &image("image/png")), file);
    }
}
