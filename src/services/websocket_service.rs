
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    dto::ws::ClientMessage,
    services::game_service,
    state::{ConnectionId, SharedState},
};

/// Handle the full lifecycle for an individual WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let conn_id = game_service::connect(&state, outbound_tx.clone()).await;

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(%conn_id, payload = %text, "received client message");
                match ClientMessage::from_json_str(&text) {
                    Ok(msg) => dispatch(&state, conn_id, msg).await,
                    Err(err) => {
                        warn!(%conn_id, error = %err, "failed to parse client message");
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%conn_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%conn_id, error = %err, "websocket error");
                break;
            }
        }
    }

    game_service::disconnect(&state, conn_id).await;
    info!(%conn_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Route a decoded client message to the matching gateway operation.
async fn dispatch(state: &SharedState, conn_id: ConnectionId, message: ClientMessage) {
    match message {
        ClientMessage::JoinLobby { name } => game_service::join(state, conn_id, &name).await,
        ClientMessage::SubmitAnswer { index } => {
            // Rejections are already reported to the submitter.
            let _ = game_service::submit_answer(state, conn_id, index).await;
        }
        ClientMessage::AdminNextQuestion => {
            info!(%conn_id, "operator advance requested over websocket");
            game_service::advance_question(state).await;
        }
        ClientMessage::Unknown => {
            debug!(%conn_id, "ignoring unknown message type");
        }
    }
}

/// Drop the last local sender and wait for the writer task to flush and exit.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{
            events,
            game_service::tests::{TestClient, test_state},
        },
        state::quiz::fixtures::question_set,
    };

    #[tokio::test]
    async fn dispatch_routes_each_message_kind() {
        let state = test_state();
        let mut ada = TestClient::connect(&state).await;
        ada.frames();

        dispatch(&state, ada.id, ClientMessage::JoinLobby { name: "Ada".into() }).await;
        assert_eq!(ada.events(), vec![events::EVENT_UPDATE_PLAYERS]);

        state
            .with_session_mut(|s| s.load_new_quiz(question_set(1)))
            .await;
        dispatch(&state, ada.id, ClientMessage::AdminNextQuestion).await;
        assert_eq!(ada.events(), vec![events::EVENT_NEW_QUESTION]);

        dispatch(&state, ada.id, ClientMessage::SubmitAnswer { index: 3 }).await;
        assert_eq!(
            ada.events(),
            vec![events::EVENT_ANSWER_RESULT, events::EVENT_UPDATE_LEADERBOARD]
        );

        dispatch(&state, ada.id, ClientMessage::Unknown).await;
        assert!(ada.frames().is_empty());
    }

    #[tokio::test]
    async fn malformed_answer_frame_does_not_consume_the_answer() {
        let state = test_state();
        let mut ada = TestClient::connect(&state).await;
        game_service::join(&state, ada.id, "Ada").await;
        state
            .with_session_mut(|s| s.load_new_quiz(question_set(1)))
            .await;
        game_service::advance_question(&state).await;
        ada.frames();

        assert!(ClientMessage::from_json_str(r#"{"type":"submit_answer","index":"B"}"#).is_err());

        let result = game_service::submit_answer(&state, ada.id, 0).await.unwrap();
        assert!(result.correct);
    }
}
