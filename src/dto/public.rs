//! Public session snapshot.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::{
        common::{PlayerSummary, QuestionPayload, summaries},
        format_system_time,
        phase::VisibleQuizPhase,
    },
    state::{Session, state_machine::QuizPhase},
};

/// Read-only view of the live session. Never exposes correct answers.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: VisibleQuizPhase,
    /// Increments on every quiz load.
    pub epoch: u64,
    /// Cursor position; absent before the first question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
    /// Size of the installed question set.
    pub question_count: usize,
    /// Present while a question accepts answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionPayload>,
    /// Roster in join order.
    pub players: Vec<PlayerSummary>,
    /// Top of the ranking.
    pub leaderboard: Vec<PlayerSummary>,
    /// RFC 3339 timestamp of the last quiz load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    /// True when no generative backend is installed.
    pub degraded: bool,
}

impl SessionSnapshot {
    /// Project `session`, truncating the leaderboard to `leaderboard_limit`.
    pub fn from_session(session: &Session, leaderboard_limit: usize, degraded: bool) -> Self {
        let phase = session.phase();
        let current_question = match phase {
            QuizPhase::QuestionOpen { index } => session
                .current_question()
                .map(|question| QuestionPayload::from_question(index, question)),
            _ => None,
        };

        Self {
            phase: (&phase).into(),
            epoch: session.epoch(),
            question_index: session.cursor(),
            question_count: session.question_count(),
            current_question,
            players: summaries(session.roster()),
            leaderboard: summaries(session.leaderboard(leaderboard_limit)),
            loaded_at: session.loaded_at().map(format_system_time),
            degraded,
        }
    }
}
