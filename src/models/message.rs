use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Delivery state of a message. Ordering matters: a message only ever moves
/// forward through `Sent < Delivered < Read`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

/// A chat message row. `conversation_key` is the storage partition; `id` is
/// unique within it. Body, sender and receiver are immutable after creation;
/// only the status fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub conversation_key: String,
    pub id: Uuid,
    pub sender_id: String,
    /// Display name snapshot taken at send time; not retroactively updated.
    pub sender_name: String,
    pub receiver_id: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        conversation_key: String,
        sender_id: String,
        sender_name: String,
        receiver_id: String,
        body: String,
    ) -> Self {
        Self {
            conversation_key,
            id: Uuid::new_v4(),
            sender_id,
            sender_name,
            receiver_id,
            body,
            status: MessageStatus::Sent,
            created_at: Utc::now(),
            delivered_at: None,
            read_at: None,
        }
    }
}

/// Wire shape of a message, returned by the HTTP surface and carried in
/// websocket `message_received` events.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageView {
    pub id: Uuid,
    pub conversation_key: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Message> for MessageView {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_key: m.conversation_key,
            sender_id: m.sender_id,
            sender_name: m.sender_name,
            receiver_id: m.receiver_id,
            body: m.body,
            status: m.status,
            created_at: m.created_at,
            delivered_at: m.delivered_at,
            read_at: m.read_at,
        }
    }
}
