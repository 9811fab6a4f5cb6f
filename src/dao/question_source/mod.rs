//! Question sources: backends that turn free text into raw quiz JSON.

#[cfg(feature = "gemini")]
pub mod gemini;

use futures::future::BoxFuture;

use crate::dao::generation::GenerationResult;

/// Prompt sent to a question source: the fixed output contract plus the operator's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// System-level instructions describing the expected output shape.
    pub instructions: &'static str,
    /// Free-text source material (meeting notes).
    pub source_text: String,
}

/// Abstraction over the generative backend that turns free text into quiz JSON.
///
/// Implementations return the raw text produced by the backend; cleaning,
/// parsing and validation belong to the generation pipeline.
pub trait QuestionSource: Send + Sync {
    /// Ask the backend for quiz JSON; the returned text is not yet validated.
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, GenerationResult<String>>;
}
