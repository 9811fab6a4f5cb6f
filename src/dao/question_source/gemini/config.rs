//! Connection settings for the Gemini API.

use super::error::{GeminiError, GeminiResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Runtime configuration describing how to reach the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root, without a trailing path.
    pub base_url: String,
    /// Model name used in the `generateContent` path.
    pub model: String,
    /// Key sent in the `x-goog-api-key` header.
    pub api_key: String,
}

impl GeminiConfig {
    /// Construct a configuration for the public endpoint and default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Select another model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another endpoint (proxy, emulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeminiError::MissingEnvVar {
                var: "GEMINI_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        Ok(config)
    }
}
