//! SSE payloads.

use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::common::PlayerSummary;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE `event:` field; `None` sends an unnamed message.
    pub event: Option<String>,
    /// SSE `data:` field, usually JSON.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize + ?Sized,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
/// Broadcast after a new question set has been installed.
pub struct QuizLoadedEvent {
    /// Number of questions installed.
    pub question_count: usize,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
/// Broadcast when the cursor moves past the last question.
pub struct GameOverEvent {
    /// Final ranking at the time the quiz finished.
    pub leaderboard: Vec<PlayerSummary>,
}
