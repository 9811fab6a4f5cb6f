//! DTO definitions used by the operator REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::common::QuestionPayload;

/// Source material the quiz is generated from.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoadQuizRequest {
    /// Free-text meeting notes. Missing or blank text is a client error.
    #[serde(default)]
    pub mom: Option<String>,
}

/// Outcome of a quiz load request.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LoadQuizResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// `Quiz Loaded`.
    pub message: String,
    /// Number of questions installed.
    pub question_count: usize,
}

/// Outcome of an operator advance.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct AdvanceResponse {
    /// True once the cursor moved past the last question.
    pub finished: bool,
    /// The question just opened, unless finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionPayload>,
}
