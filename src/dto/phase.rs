//! Quiz phase as exposed to clients.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::QuizPhase;

/// Publicly visible quiz phase exposed to clients (REST/SSE/WebSocket).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleQuizPhase {
    /// No question opened since the last load.
    NotStarted,
    /// A question is accepting answers.
    QuestionOpen,
    /// Every question has been played.
    Finished,
}

impl From<&QuizPhase> for VisibleQuizPhase {
    fn from(value: &QuizPhase) -> Self {
        match value {
            QuizPhase::NotStarted => VisibleQuizPhase::NotStarted,
            QuizPhase::QuestionOpen { .. } => VisibleQuizPhase::QuestionOpen,
            QuizPhase::Finished => VisibleQuizPhase::Finished,
        }
    }
}
