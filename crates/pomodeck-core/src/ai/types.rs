//! Request and response shapes for the `generateContent` endpoint, plus
//! the domain types handed back to callers.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AiError;
use crate::timer::Settings;

/// Durations (hours) and a theme suggested for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    pub pomodoro: f64,
    pub short_break: f64,
    pub long_break: f64,
    pub reasoning: String,
    pub theme_description: String,
}

impl AiRecommendation {
    pub(crate) fn from_text(text: &str) -> Result<Self, AiError> {
        let rec: AiRecommendation = serde_json::from_str(text.trim())
            .map_err(|e| AiError::Malformed(format!("recommendation is not valid JSON: {e}")))?;
        for (field, hours) in [
            ("pomodoro", rec.pomodoro),
            ("shortBreak", rec.short_break),
            ("longBreak", rec.long_break),
        ] {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(AiError::Malformed(format!(
                    "{field} must be a positive number of hours, got {hours}"
                )));
            }
        }
        Ok(rec)
    }

    /// Suggested durations with the auto-start flags of `current`.
    pub fn settings(&self, current: &Settings) -> Settings {
        Settings {
            focus_hours: self.pomodoro,
            short_break_hours: self.short_break,
            long_break_hours: self.long_break,
            ..current.clone()
        }
    }
}

/// An image returned inline by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, AiError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| AiError::Malformed(format!("image data is not base64: {e}")))
    }

    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

// ── Wire format ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of the first candidate, if any.
    pub(crate) fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image of the first candidate.
    pub(crate) fn image(&self) -> Option<GeneratedImage> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
            .map(|d| GeneratedImage {
                mime_type: d.mime_type.clone(),
                data: d.data.clone(),
            })
    }
}

pub(crate) fn recommendation_request(task: &str) -> Value {
    let prompt = format!(
        "I have a task: \"{task}\". Recommend optimal Pomodoro timer settings (in hours, \
         e.g. 0.5 for 30 minutes) and a visual theme description for a background that \
         aids focus for this specific task."
    );
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "pomodoro": { "type": "NUMBER", "description": "Focus duration in hours (e.g. 0.75)" },
                    "shortBreak": { "type": "NUMBER", "description": "Short break duration in hours (e.g. 0.1)" },
                    "longBreak": { "type": "NUMBER", "description": "Long break duration in hours (e.g. 0.25)" },
                    "reasoning": { "type": "STRING", "description": "Brief explanation of why these settings fit the task" },
                    "themeDescription": { "type": "STRING", "description": "A descriptive prompt for an abstract background image suitable for this task" }
                },
                "required": ["pomodoro", "shortBreak", "longBreak", "reasoning", "themeDescription"]
            }
        }
    })
}

pub(crate) fn background_request(style: &str) -> Value {
    let prompt = format!(
        "Create a high-quality, abstract, aesthetic wallpaper. Style: {style}. No text. 4k resolution."
    );
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseModalities": ["IMAGE"],
            "imageConfig": { "aspectRatio": "16:9" }
        }
    })
}
