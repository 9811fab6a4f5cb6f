//! HTTP client for the `generateContent` endpoint.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::dao::{
    generation::GenerationResult,
    question_source::{GenerationRequest, QuestionSource},
};

use super::{
    config::GeminiConfig,
    error::{GeminiError, GeminiResult},
    models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig},
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

/// [`QuestionSource`] backed by the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiQuestionSource {
    client: Client,
    endpoint: Arc<str>,
    model: Arc<str>,
    api_key: Arc<str>,
}

impl GeminiQuestionSource {
    /// Build the HTTP client for the configured model.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| GeminiError::ClientBuilder { source })?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint: Arc::from(endpoint),
            model: Arc::from(config.model),
            api_key: Arc::from(config.api_key),
        })
    }

    async fn generate_content(&self, request: GenerationRequest) -> GeminiResult<String> {
        let body = GenerateContentRequest {
            system_instruction: Content::text(None, request.instructions),
            contents: vec![Content::text(Some("user"), request.source_text)],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
            },
        };

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.endpoint.as_ref())
            .header(API_KEY_HEADER, self.api_key.as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|source| GeminiError::RequestSend {
                model: self.model.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(GeminiError::RequestStatus {
                model: self.model.to_string(),
                status: response.status(),
            });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|source| GeminiError::DecodeResponse {
                model: self.model.to_string(),
                source,
            })?;

        payload.into_text().ok_or(GeminiError::EmptyCandidate)
    }
}

impl QuestionSource for GeminiQuestionSource {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, GenerationResult<String>> {
        let source = self.clone();
        Box::pin(async move { source.generate_content(request).await.map_err(Into::into) })
    }
}
