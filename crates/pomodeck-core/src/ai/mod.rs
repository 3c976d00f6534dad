//! Generative-AI service client.
//!
//! Talks to a Gemini-compatible `generateContent` REST endpoint. Each call
//! is a single request/response; failures are logged and returned, never
//! retried.

mod types;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AiError;
use types::{background_request, recommendation_request, GenerateResponse};

pub use types::{AiRecommendation, GeneratedImage};

pub const API_KEY_ENV: &str = "POMODECK_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// AI service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Overridden by `POMODECK_API_KEY` or `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/".into()
}
fn default_text_model() -> String {
    "gemini-3-flash-preview".into()
}
fn default_image_model() -> String {
    "gemini-2.5-flash-image".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    /// Environment first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|var| std::env::var(var).ok())
    }

    fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        [API_KEY_ENV, GEMINI_API_KEY_ENV]
            .iter()
            .filter_map(|var| env(var))
            .chain(self.api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
    }
}

pub struct AiClient {
    http: Client,
    config: AiConfig,
    api_key: String,
}

impl AiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let api_key = config.resolve_api_key().ok_or(AiError::MissingApiKey)?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: AiConfig, api_key: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Suggested durations and a wallpaper theme for a task description.
    pub async fn recommend(&self, task: &str) -> Result<AiRecommendation, AiError> {
        let result = self.try_recommend(task).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "error getting recommendations");
        }
        result
    }

    /// A 16:9 abstract wallpaper for a theme description.
    pub async fn generate_background(&self, prompt: &str) -> Result<GeneratedImage, AiError> {
        let result = self.try_generate_background(prompt).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "error generating background");
        }
        result
    }

    async fn try_recommend(&self, task: &str) -> Result<AiRecommendation, AiError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        let response = self
            .generate(&self.config.text_model, &recommendation_request(task))
            .await?;
        let text = response.text().ok_or(AiError::EmptyResponse)?;
        AiRecommendation::from_text(&text)
    }

    async fn try_generate_background(&self, prompt: &str) -> Result<GeneratedImage, AiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        let response = self
            .generate(&self.config.image_model, &background_request(prompt))
            .await?;
        response.image().ok_or(AiError::NoImage)
    }

    fn endpoint(&self, model: &str) -> Result<Url, AiError> {
        let mut base = self.config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?.join(&format!("v1beta/models/{model}:generateContent"))?)
    }

    async fn generate(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<GenerateResponse, AiError> {
        let url = self.endpoint(model)?;
        tracing::debug!(%url, "generateContent request");
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AiError::Malformed(e.to_string()))
    }
}
