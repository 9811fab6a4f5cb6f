//! Realtime gateway operations: each inbound event is mapped onto the session
//! and answered with the matching broadcasts, all under one session lock turn.

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{common::QuestionPayload, public::SessionSnapshot, ws::ConnectedNotice},
    services::events,
    state::{
        ClientConnection, ConnectionId, SharedState,
        session::{AnswerRejected, ScoreResult},
        state_machine::Advance,
    },
};

/// Register a new connection and greet it with the live session state.
pub async fn connect(state: &SharedState, tx: mpsc::UnboundedSender<Message>) -> ConnectionId {
    let conn_id = Uuid::new_v4();
    let degraded = state.is_degraded().await;
    let limit = state.config().scoring.leaderboard_limit;

    state
        .with_session(|session| {
            // Registered under the session lock so no broadcast slips in before the greeting.
            state.connections().insert(conn_id, ClientConnection { tx });
            let notice = ConnectedNotice {
                connection_id: conn_id,
                session: SessionSnapshot::from_session(session, limit, degraded),
            };
            events::send_connected(state, &conn_id, &notice);
        })
        .await;

    info!(%conn_id, "client connected");
    conn_id
}

/// Register `conn_id` as a participant named `name` and broadcast the roster.
pub async fn join(state: &SharedState, conn_id: ConnectionId, name: &str) {
    let name = name.trim();
    if name.is_empty() {
        warn!(%conn_id, "join ignored: blank display name");
        events::send_join_rejected(state, &conn_id, "display name must not be blank".into());
        return;
    }

    state
        .with_session_mut(|session| {
            session.add_or_update_participant(conn_id, name.to_string());
            info!(
                %conn_id,
                name,
                participants = session.participant_count(),
                "participant joined"
            );
            events::broadcast_roster(state, session);
        })
        .await;
}

/// Record an answer; on success the submitter gets a private result and
/// everyone gets the updated leaderboard. Rejections broadcast nothing.
pub async fn submit_answer(
    state: &SharedState,
    conn_id: ConnectionId,
    index: i64,
) -> Result<ScoreResult, AnswerRejected> {
    state
        .with_session_mut(|session| match session.record_answer(&conn_id, index) {
            Ok(result) => {
                info!(
                    %conn_id,
                    index,
                    correct = result.correct,
                    score = result.score,
                    "answer recorded"
                );
                events::send_answer_result(state, &conn_id, result);
                events::broadcast_leaderboard(state, session);
                Ok(result)
            }
            Err(rejected) => {
                debug!(%conn_id, index, reason = %rejected, "answer rejected");
                events::send_answer_rejected(state, &conn_id, rejected.to_string());
                Err(rejected)
            }
        })
        .await
}

/// Open the next question, or signal the end of the quiz, to every connection.
pub async fn advance_question(state: &SharedState) -> Advance {
    state
        .with_session_mut(|session| {
            let outcome = session.advance();
            match &outcome {
                Advance::Question(opened) => {
                    events::broadcast_new_question(state, &QuestionPayload::from(opened.clone()));
                }
                Advance::Finished => events::broadcast_game_over(state, session),
            }
            outcome
        })
        .await
}

/// Forget the connection and its participant, then broadcast the roster.
pub async fn disconnect(state: &SharedState, conn_id: ConnectionId) {
    state.connections().remove(&conn_id);
    state
        .with_session_mut(|session| {
            match session.remove_participant(&conn_id) {
                Some(participant) => info!(
                    %conn_id,
                    name = %participant.name,
                    participants = session.participant_count(),
                    "participant left"
                ),
                None => debug!(%conn_id, "connection closed without joining"),
            }
            events::broadcast_roster(state, session);
        })
        .await;
}
