//! Payloads shared by several channels.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{quiz::Question, session::Standing, state_machine::OpenedQuestion};

/// Name and score of a participant, as shown in rosters and leaderboards.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    /// Display name.
    pub name: String,
    /// Cumulative score.
    pub score: u32,
}

impl From<Standing> for PlayerSummary {
    fn from(value: Standing) -> Self {
        Self {
            name: value.name,
            score: value.score,
        }
    }
}

/// Question as broadcast to participants. Never carries the correct index.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct QuestionPayload {
    /// Cursor position of the question (0-based).
    pub index: usize,
    /// Question text.
    pub question: String,
    /// The four answer options, in answer-index order.
    pub options: Vec<String>,
}

impl From<OpenedQuestion> for QuestionPayload {
    fn from(value: OpenedQuestion) -> Self {
        Self {
            index: value.index,
            question: value.text,
            options: value.options,
        }
    }
}

impl QuestionPayload {
    /// Public projection of `question` opened at `index`.
    pub fn from_question(index: usize, question: &Question) -> Self {
        Self {
            index,
            question: question.text.clone(),
            options: question.options.to_vec(),
        }
    }
}

/// Convert session standings into wire summaries, keeping their order.
pub fn summaries(standings: Vec<Standing>) -> Vec<PlayerSummary> {
    standings.into_iter().map(Into::into).collect()
}
