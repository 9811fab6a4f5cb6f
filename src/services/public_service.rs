//! Read-only public projection of the live session.

use crate::{dto::public::SessionSnapshot, state::SharedState};

/// Return the session as seen by spectators: never includes correct answers.
pub async fn get_session(state: &SharedState) -> SessionSnapshot {
    let degraded = state.is_degraded().await;
    let limit = state.config().scoring.leaderboard_limit;
    state
        .with_session(|session| SessionSnapshot::from_session(session, limit, degraded))
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        dao::question_source::testing::ScriptedSource,
        services::game_service::{self, tests::test_state},
        state::quiz::fixtures::question_set,
    };

    #[tokio::test]
    async fn snapshot_tracks_phase_and_hides_answers() {
        let state = test_state();
        let before = serde_json::to_value(get_session(&state).await).unwrap();
        assert_eq!(before["phase"], "not_started");
        assert_eq!(before["question_count"], 0);
        assert!(before.get("loaded_at").is_none());

        state
            .with_session_mut(|s| s.load_new_quiz(question_set(2)))
            .await;
        game_service::advance_question(&state).await;

        let open = serde_json::to_value(get_session(&state).await).unwrap();
        assert_eq!(open["phase"], "question_open");
        assert_eq!(open["question_index"], 0);
        assert_eq!(open["question_count"], 2);
        assert_eq!(open["epoch"], 1);
        assert_eq!(open["current_question"]["question"], "Question 1?");
        assert!(open["current_question"].get("correct_index").is_none());
        assert!(open["loaded_at"].is_string());
        assert_eq!(open["players"], json!([]));
    }

    #[tokio::test]
    async fn snapshot_reports_degraded_mode() {
        let state = test_state();
        assert!(get_session(&state).await.degraded);

        state
            .install_question_source(Arc::new(ScriptedSource::default()))
            .await;
        assert!(!get_session(&state).await.degraded);
    }
}
