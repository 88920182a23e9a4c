use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MessageStatus, MessageView};

/// Events a connected client may send over the live channel. Mirrors the
/// request/response surface: same validation, same storage writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsInboundEvent {
    Join {
        other_user_id: String,
    },
    Send {
        other_user_id: String,
        body: String,
    },
    MarkDelivered {
        message_id: Uuid,
        conversation_key: String,
    },
    MarkRead {
        message_id: Uuid,
        conversation_key: String,
    },
}

/// Events pushed to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsOutboundEvent {
    MessageReceived {
        message: MessageView,
    },
    StatusUpdated {
        message_id: Uuid,
        conversation_key: String,
        status: MessageStatus,
        delivered_at: Option<DateTime<Utc>>,
        read_at: Option<DateTime<Utc>>,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_events_parse_from_tagged_json() {
        let evt: WsInboundEvent =
            serde_json::from_str(r#"{"type":"join","other_user_id":"bob"}"#).unwrap();
        assert!(matches!(evt, WsInboundEvent::Join { other_user_id } if other_user_id == "bob"));

        let evt: WsInboundEvent =
            serde_json::from_str(r#"{"type":"send","other_user_id":"bob","body":"hi"}"#).unwrap();
        assert!(matches!(evt, WsInboundEvent::Send { .. }));
    }

    #[test]
    fn outbound_error_serializes_with_tag() {
        let json = serde_json::to_string(&WsOutboundEvent::Error {
            message: "boom".into(),
        })
        .unwrap();
        assert!(json.contains(r#""type":"error""#));
    }
}
