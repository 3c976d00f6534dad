//! Cosmetic theming: wallpaper, wallpaper position and bezel color.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const WALLPAPER_PRESETS: [&str; 7] = [
    "#191919", "#172554", "#064e3b", "#450a0a", "#3f3f46", "#581c87", "#e5e7eb",
];

pub const BEZEL_PRESETS: [&str; 6] = [
    "#9ca3af", "#1f2937", "#e5e5e5", "#d4c4b7", "#f59e0b", "#3b82f6",
];

pub const DEFAULT_WALLPAPER: &str = "#191919";
pub const DEFAULT_BEZEL: &str = "#9ca3af";

/// What is drawn behind the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    Transparent,
    Color(String),
    /// URL or `data:` URI.
    Image(String),
}

impl Background {
    /// `transparent`, a `#hex`/`rgb(..)` color, or else an image reference.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::invalid("background", "value is empty"));
        }
        if value.eq_ignore_ascii_case("transparent") {
            return Ok(Background::Transparent);
        }
        if is_color_like(value) {
            return parse_color(value, "background").map(Background::Color);
        }
        Ok(Background::Image(value.to_string()))
    }

    /// Read a local photo into an inline `data:` URI image.
    pub fn from_image_file(path: &Path) -> Result<Self, ValidationError> {
        let invalid = |message: String| ValidationError::invalid("wallpaper", message);
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(image_mime_type)
            .ok_or_else(|| invalid(format!("not an image file: {}", path.display())))?;
        if !path.is_file() {
            return Err(invalid(format!("no such file: {}", path.display())));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| invalid(format!("cannot read {}: {e}", path.display())))?;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Background::Image(format!("data:{mime};base64,{data}")))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Background::Image(_))
    }

    /// The value as typed into the hex field; empty for images.
    pub fn hex_field(&self) -> &str {
        match self {
            Background::Transparent => "transparent",
            Background::Color(c) => c,
            Background::Image(_) => "",
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(DEFAULT_WALLPAPER.into())
    }
}

/// Wallpaper focal point as percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPosition {
    pub x: f64,
    pub y: f64,
}

impl BackgroundPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_pct(x),
            y: clamp_pct(y),
        }
    }
}

impl Default for BackgroundPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() {
        50.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub background: Background,
    pub position: BackgroundPosition,
    /// `None` is a transparent bezel.
    pub bezel: Option<String>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background: Background::default(),
            position: BackgroundPosition::default(),
            bezel: Some(DEFAULT_BEZEL.into()),
        }
    }
}

impl Appearance {
    pub fn set_background(&mut self, value: &str) -> Result<(), ValidationError> {
        self.background = Background::parse(value)?;
        Ok(())
    }

    /// Use a local photo as the wallpaper.
    pub fn upload_wallpaper(&mut self, path: &Path) -> Result<(), ValidationError> {
        self.background = Background::from_image_file(path)?;
        Ok(())
    }

    pub fn set_bezel(&mut self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        self.bezel = if value.eq_ignore_ascii_case("transparent") {
            None
        } else {
            Some(parse_color(value, "bezel")?)
        };
        Ok(())
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = BackgroundPosition::new(x, y);
    }

    pub fn bezel_label(&self) -> &str {
        self.bezel.as_deref().unwrap_or("transparent")
    }
}

fn image_mime_type(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn is_color_like(value: &str) -> bool {
    value.starts_with('#') || value.to_ascii_lowercase().starts_with("rgb")
}

/// Accept `#rgb`, `#rrggbb` (normalised to lowercase) or an `rgb(..)`/`rgba(..)` form.
pub fn parse_color(value: &str, field: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let valid_len = hex.len() == 3 || hex.len() == 6;
        if valid_len && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(format!("#{}", hex.to_ascii_lowercase()));
        }
        return Err(ValidationError::invalid(
            field,
            format!("'{value}' is not a #rgb or #rrggbb color"),
        ));
    }
    let lower = value.to_ascii_lowercase();
    if (lower.starts_with("rgb(") || lower.starts_with("rgba(")) && lower.ends_with(')') {
        return Ok(lower);
    }
    Err(ValidationError::invalid(
        field,
        format!("'{value}' is not a color"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_photo_becomes_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Beach.JPG");
        std::fs::write(&path, b"hello").unwrap();

        let mut a = Appearance::default();
        a.upload_wallpaper(&path).unwrap();
        assert_eq!(
            a.background,
            Background::Image("data:image/jpeg;base64,aGVsbG8=".into())
        );
        assert!(a.background.is_image());
        assert_eq!(a.background.hex_field(), "");
    }

    #[test]
    fn upload_rejects_missing_or_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Appearance::default();

        assert!(a.upload_wallpaper(&dir.path().join("gone.png")).is_err());

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"text").unwrap();
        assert!(a.upload_wallpaper(&notes).is_err());

        assert!(a.upload_wallpaper(dir.path()).is_err());
        assert_eq!(a.background, Background::default());
    }

    #[test]
    fn parse_background_kinds() {
        assert_eq!(Background::parse("transparent").unwrap(), Background::Transparent);
        assert_eq!(
            Background::parse("#172554").unwrap(),
            Background::Color("#172554".into())
        );
        assert_eq!(
            Background::parse("rgb(1, 2, 3)").unwrap(),
            Background::Color("rgb(1, 2, 3)".into())
        );
        assert!(Background::parse("data:image/png;base64,AAAA")
            .unwrap()
            .is_image());
        assert!(Background::parse("https://example.com/a.jpg")
            .unwrap()
            .is_image());
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(Background::parse("#12345").is_err());
        assert!(Background::parse("#zzzzzz").is_err());
        assert!(Background::parse("").is_err());
    }

    #[test]
    fn hex_is_normalised() {
        assert_eq!(parse_color("#ABCDEF", "x").unwrap(), "#abcdef");
        assert_eq!(parse_color("#FfF", "x").unwrap(), "#fff");
    }

    #[test]
    fn hex_field_hides_images() {
        let bg = Background::parse("https://example.com/a.jpg").unwrap();
        assert_eq!(bg.hex_field(), "");
        assert_eq!(Background::default().hex_field(), DEFAULT_WALLPAPER);
    }

    #[test]
    fn position_is_clamped() {
        let p = BackgroundPosition::new(-5.0, 140.0);
        assert_eq!(p, BackgroundPosition { x: 0.0, y: 100.0 });
        assert_eq!(BackgroundPosition::new(f64::NAN, 20.0).x, 50.0);
    }

    #[test]
    fn bezel_accepts_presets_and_transparent() {
        let mut a = Appearance::default();
        for preset in BEZEL_PRESETS {
            a.set_bezel(preset).unwrap();
            assert_eq!(a.bezel.as_deref(), Some(preset));
        }
        a.set_bezel("transparent").unwrap();
        assert_eq!(a.bezel_label(), "transparent");
        assert!(a.set_bezel("blue-ish").is_err());
    }

    #[test]
    fn wallpaper_presets_are_valid_colors() {
        for preset in WALLPAPER_PRESETS {
            assert_eq!(
                Background::parse(preset).unwrap(),
                Background::Color(preset.to_string())
            );
        }
    }
}
