//! Request and response bodies of the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of a `generateContent` call.
pub struct GenerateContentRequest {
    /// Output contract.
    pub system_instruction: Content,
    /// Conversation turns; a single user turn here.
    pub contents: Vec<Content>,
    /// Output format constraints.
    pub generation_config: GenerationConfig,
}

/// One turn of content.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    /// `user` or `model`; absent for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text fragments, concatenated by readers.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-part content carrying `text`.
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

/// Fragment of a turn; only text parts are used.
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    /// Text of the fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Generation settings of a request.
pub struct GenerationConfig {
    /// Always `application/json`.
    pub response_mime_type: &'static str,
}

/// Body returned by `generateContent`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    /// Alternative outputs; only the first is read.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated output.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Generated turn.
    #[serde(default)]
    pub content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}
