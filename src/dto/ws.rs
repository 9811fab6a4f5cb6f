//! WebSocket wire format: inbound client messages and outbound frames.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::public::SessionSnapshot;

#[serde_as]
#[derive(Debug, Deserialize, ToSchema, PartialEq, Eq)]
/// Messages accepted from WebSocket clients.
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Register the connection as a participant.
    #[serde(rename = "join_lobby")]
    JoinLobby {
        /// Display name; blank names are refused.
        name: String,
    },
    /// Answer the open question; the index may be sent as a number or numeric text.
    #[serde(rename = "submit_answer")]
    SubmitAnswer {
        #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
        #[schema(value_type = i64)]
        /// Position of the chosen option.
        index: i64,
    },
    /// Operator request to open the next question.
    #[serde(rename = "admin_next_question")]
    AdminNextQuestion,
    /// Any other `type`; ignored by the gateway.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode one text frame. A known type with bad fields is an error.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Serialize)]
/// Frame pushed to WebSocket clients: `{"event": ..., "data": ...}`.
pub struct WsEnvelope<'a, T: ?Sized> {
    /// Event name, one of the `EVENT_*` constants.
    pub event: &'a str,
    /// Event payload.
    pub data: &'a T,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
/// Private result sent to a participant after an accepted answer.
pub struct AnswerResult {
    /// Whether the answer was right.
    pub correct: bool,
    /// Cumulative score after this answer.
    pub score: u32,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
/// Private diagnostic sent when a join or an answer is refused.
pub struct RejectionNotice {
    /// Human-readable cause.
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// First frame sent to every connection.
pub struct ConnectedNotice {
    /// Identifier assigned to this connection.
    pub connection_id: Uuid,
    /// Session state at the time of connection.
    pub session: SessionSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_accepts_integer_and_numeric_text() {
        for frame in [
            r#"{"type":"submit_answer","index":2}"#,
            r#"{"type":"submit_answer","index":"2"}"#,
        ] {
            assert_eq!(
                ClientMessage::from_json_str(frame).unwrap(),
                ClientMessage::SubmitAnswer { index: 2 }
            );
        }
    }

    #[test]
    fn submit_rejects_non_numeric_index() {
        assert!(ClientMessage::from_json_str(r#"{"type":"submit_answer","index":"B"}"#).is_err());
        assert!(ClientMessage::from_json_str(r#"{"type":"submit_answer"}"#).is_err());
    }

    #[test]
    fn parses_join_and_operator_messages() {
        assert_eq!(
            ClientMessage::from_json_str(r#"{"type":"join_lobby","name":"Ada"}"#).unwrap(),
            ClientMessage::JoinLobby { name: "Ada".into() }
        );
        assert_eq!(
            ClientMessage::from_json_str(r#"{"type":"admin_next_question"}"#).unwrap(),
            ClientMessage::AdminNextQuestion
        );
        assert_eq!(
            ClientMessage::from_json_str(r#"{"type":"dance"}"#).unwrap(),
            ClientMessage::Unknown
        );
    }

    #[test]
    fn envelope_wraps_event_name_and_data() {
        let frame = serde_json::to_value(WsEnvelope {
            event: "answer_result",
            data: &AnswerResult {
                correct: true,
                score: 10,
            },
        })
        .unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"event": "answer_result", "data": {"correct": true, "score": 10}})
        );
    }
}
