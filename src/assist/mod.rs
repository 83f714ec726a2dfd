//! AI text assist
//!
//! Optional note prefill over a selection: a short summary or a
//! translation, produced by an external model. This sits outside the
//! anchoring core; provider failure is logged and degrades to no prefill,
//! never an error for the caller.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AssistConfig;

/// What to derive from the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistAction {
    Summarize,
    Translate,
}

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("assist request failed: {0}")]
    Http(String),

    #[error("assist provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("assist provider returned no text")]
    Empty,
}

/// A text-generation backend.
#[async_trait]
pub trait AssistProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, AssistError>;
}

/// Google Gemini backend.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl AssistProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AssistError::Api { status, message });
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        let text = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AssistError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Local Ollama backend.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl AssistProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AssistError::Api { status, message });
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        let text = result["response"].as_str().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(AssistError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Note-prefill service over whichever provider is configured.
///
/// Gemini when an API key is present, the local Ollama instance
/// otherwise, chosen once at startup.
pub struct AssistService {
    provider: Box<dyn AssistProvider>,
}

impl AssistService {
    pub fn from_config(config: &AssistConfig) -> Self {
        let provider: Box<dyn AssistProvider> = match &config.gemini_api_key {
            Some(key) if !key.is_empty() => {
                Box::new(GeminiProvider::new(key, &config.gemini_model))
            }
            _ => Box::new(OllamaProvider::new(&config.ollama_url, &config.ollama_model)),
        };
        info!(provider = provider.name(), "assist provider selected");
        Self { provider }
    }

    #[cfg(test)]
    pub(crate) fn with_provider(provider: Box<dyn AssistProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Derive prefill text for a note. `None` on any provider failure;
    /// the note simply starts empty.
    pub async fn prefill(
        &self,
        action: AssistAction,
        text: &str,
        target_lang: Option<&str>,
    ) -> Option<String> {
        let prompt = build_prompt(action, text, target_lang);
        match self.provider.generate(&prompt).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "assist degraded to empty prefill");
                None
            }
        }
    }
}

fn build_prompt(action: AssistAction, text: &str, target_lang: Option<&str>) -> String {
    match action {
        AssistAction::Summarize => format!(
            "Summarize the following Italian legal text briefly and clearly in Italian:\n\n{text}"
        ),
        AssistAction::Translate => {
            let lang = target_lang.filter(|l| !l.is_empty()).unwrap_or("English");
            format!(
                "Translate the following Italian legal text to {lang}. \
                 Maintain the legal terminology accuracy:\n\n{text}"
            )
        }
    }
}
