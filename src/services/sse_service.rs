
use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{dto::sse::ServerEvent, state::SharedState};

/// Subscribe to the shared public SSE stream.
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Convert a broadcast receiver into an SSE response, forwarding events until
/// the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Skip lagged messages but keep the stream alive.
                            debug!(skipped, "public SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        info!("Public SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Send a human-readable info message onto the public SSE stream.
pub fn broadcast_public_info(state: &SharedState, message: &str) {
    state.public_sse().broadcast(ServerEvent::new(
        Some("info".to_string()),
        message.to_string(),
    ));
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        events,
        game_service::{
            self,
            tests::{TestClient, test_state},
        },
    };

    #[tokio::test]
    async fn broadcasts_are_mirrored_on_the_public_stream() {
        let state = test_state();
        let mut receiver = subscribe_public(&state);
        let ada = TestClient::connect(&state).await;

        game_service::join(&state, ada.id, "Ada").await;

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.event.as_deref(), Some(events::EVENT_UPDATE_PLAYERS));
        assert_eq!(event.data, r#"[{"name":"Ada","score":0}]"#);
        // The private greeting never reaches spectators.
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn info_messages_carry_plain_text() {
        let state = test_state();
        let mut receiver = subscribe_public(&state);

        broadcast_public_info(&state, "public stream connected");

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.event.as_deref(), Some("info"));
        assert_eq!(event.data, "public stream connected");
    }
}
