//! Outbound events: broadcasts to every open connection (mirrored on the public
//! SSE stream) and private messages to a single connection.
//!
//! This is the only module that writes to the connection registry.

use axum::extract::ws::Message;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    dto::{
        common::{PlayerSummary, QuestionPayload, summaries},
        sse::{GameOverEvent, QuizLoadedEvent, ServerEvent},
        ws::{AnswerResult, ConnectedNotice, RejectionNotice, WsEnvelope},
    },
    state::{ConnectionId, Session, SharedState, session::ScoreResult},
};

/// Broadcast: full roster in join order.
pub const EVENT_UPDATE_PLAYERS: &str = "update_players";
/// Broadcast: a question opened.
pub const EVENT_NEW_QUESTION: &str = "new_question";
/// Broadcast: a new question set was installed.
pub const EVENT_QUIZ_LOADED: &str = "quiz_loaded";
/// Broadcast: ranking after an accepted answer.
pub const EVENT_UPDATE_LEADERBOARD: &str = "update_leaderboard";
/// Broadcast: the cursor moved past the last question.
pub const EVENT_GAME_OVER: &str = "game_over";
/// Private: scoring of the submitter's answer.
pub const EVENT_ANSWER_RESULT: &str = "answer_result";
/// Private: why an answer was ignored.
pub const EVENT_ANSWER_REJECTED: &str = "answer_rejected";
/// Private: why a join was refused.
pub const EVENT_JOIN_REJECTED: &str = "join_rejected";
/// Private: greeting with the connection id and a session snapshot.
pub const EVENT_CONNECTED: &str = "connected";

/// Broadcast the full roster in join order.
pub fn broadcast_roster(state: &SharedState, session: &Session) {
    let players: Vec<PlayerSummary> = summaries(session.roster());
    broadcast(state, EVENT_UPDATE_PLAYERS, &players);
}

/// Broadcast the top of the leaderboard.
pub fn broadcast_leaderboard(state: &SharedState, session: &Session) {
    let limit = state.config().scoring.leaderboard_limit;
    let leaderboard: Vec<PlayerSummary> = summaries(session.leaderboard(limit));
    broadcast(state, EVENT_UPDATE_LEADERBOARD, &leaderboard);
}

/// Broadcast a freshly opened question (text and options only).
pub fn broadcast_new_question(state: &SharedState, question: &QuestionPayload) {
    broadcast(state, EVENT_NEW_QUESTION, question);
}

/// Broadcast that a new question set is installed.
pub fn broadcast_quiz_loaded(state: &SharedState, question_count: usize) {
    broadcast(state, EVENT_QUIZ_LOADED, &QuizLoadedEvent { question_count });
}

/// Broadcast the terminal signal with the final standings.
pub fn broadcast_game_over(state: &SharedState, session: &Session) {
    let limit = state.config().scoring.leaderboard_limit;
    let payload = GameOverEvent {
        leaderboard: summaries(session.leaderboard(limit)),
    };
    broadcast(state, EVENT_GAME_OVER, &payload);
}

/// Tell a participant how their answer was scored.
pub fn send_answer_result(state: &SharedState, conn_id: &ConnectionId, result: ScoreResult) {
    let payload = AnswerResult {
        correct: result.correct,
        score: result.score,
    };
    send_to(state, conn_id, EVENT_ANSWER_RESULT, &payload);
}

/// Tell a participant why their answer was ignored.
pub fn send_answer_rejected(state: &SharedState, conn_id: &ConnectionId, reason: String) {
    send_to(state, conn_id, EVENT_ANSWER_REJECTED, &RejectionNotice { reason });
}

/// Tell a connection why its join was refused.
pub fn send_join_rejected(state: &SharedState, conn_id: &ConnectionId, reason: String) {
    send_to(state, conn_id, EVENT_JOIN_REJECTED, &RejectionNotice { reason });
}

/// Greet a new connection with its identifier and the live session state.
pub fn send_connected(state: &SharedState, conn_id: &ConnectionId, notice: &ConnectedNotice) {
    send_to(state, conn_id, EVENT_CONNECTED, notice);
}

/// Serialize `payload` and push it to every open connection and the public SSE stream.
fn broadcast<T>(state: &SharedState, event: &str, payload: &T)
where
    T: ?Sized + Serialize,
{
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(server_event) => state.public_sse().broadcast(server_event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }

    let Some(frame) = encode_frame(event, payload) else {
        return;
    };

    let mut closed = Vec::new();
    for connection in state.connections().iter() {
        if connection.tx.send(frame.clone()).is_err() {
            closed.push(*connection.key());
        }
    }
    // Removed after iterating so no shard lock is held while mutating the map.
    for conn_id in closed {
        debug!(%conn_id, event, "dropping closed connection during broadcast");
        state.connections().remove(&conn_id);
    }
}

/// Serialize `payload` and push it to one connection, if it is still open.
fn send_to<T>(state: &SharedState, conn_id: &ConnectionId, event: &str, payload: &T)
where
    T: ?Sized + Serialize,
{
    let Some(tx) = state.connections().get(conn_id).map(|conn| conn.tx.clone()) else {
        debug!(%conn_id, event, "connection gone; private event dropped");
        return;
    };
    if let Some(frame) = encode_frame(event, payload) {
        send_frame(&tx, frame);
    }
}

fn send_frame(tx: &mpsc::UnboundedSender<Message>, frame: Message) {
    // A closed writer means the socket task is already shutting down.
    let _ = tx.send(frame);
}

fn encode_frame<T>(event: &str, payload: &T) -> Option<Message>
where
    T: ?Sized + Serialize,
{
    match serde_json::to_string(&WsEnvelope {
        event,
        data: payload,
    }) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(err) => {
            warn!(event, error = %err, "failed to serialize websocket payload");
            None
        }
    }
}
