use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{participants, MessageStatus};
use crate::storage::{MessageStore, StorageError};

/// Result of a delivery/read transition. `changed` is false for the
/// suppressed self-ack and for idempotent re-acks; callers only broadcast
/// when it is true.
#[derive(Debug, Clone)]
pub struct ReceiptOutcome {
    pub conversation_key: String,
    pub message_id: Uuid,
    pub status: MessageStatus,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub changed: bool,
}

pub struct ReceiptService;

impl ReceiptService {
    pub async fn mark_delivered(
        store: &dyn MessageStore,
        conversation_key: &str,
        message_id: Uuid,
        actor_id: &str,
    ) -> AppResult<ReceiptOutcome> {
        Self::mark(store, conversation_key, message_id, actor_id, MessageStatus::Delivered).await
    }

    pub async fn mark_read(
        store: &dyn MessageStore,
        conversation_key: &str,
        message_id: Uuid,
        actor_id: &str,
    ) -> AppResult<ReceiptOutcome> {
        Self::mark(store, conversation_key, message_id, actor_id, MessageStatus::Read).await
    }

    /// Advance a message to `target`. Guards, in order: the key must parse
    /// and name the actor as a participant; the row must exist; the sender
    /// can never acknowledge their own message (quiet no-op); status never
    /// regresses, so a row already at or past `target` is left untouched
    /// (idempotent). The write is a compare-and-swap on the row etag,
    /// retried once on a version race before surfacing `Conflict`.
    async fn mark(
        store: &dyn MessageStore,
        conversation_key: &str,
        message_id: Uuid,
        actor_id: &str,
        target: MessageStatus,
    ) -> AppResult<ReceiptOutcome> {
        const CAS_ATTEMPTS: u32 = 2;

        let (lo, hi) = participants(conversation_key)
            .ok_or_else(|| AppError::BadRequest("malformed conversation key".into()))?;
        if actor_id != lo && actor_id != hi {
            return Err(AppError::BadRequest(
                "actor is not a participant of this conversation".into(),
            ));
        }

        for attempt in 0..CAS_ATTEMPTS {
            let (message, etag) = store.get(conversation_key, message_id).await?;

            if message.sender_id == actor_id || message.status >= target {
                return Ok(ReceiptOutcome {
                    conversation_key: message.conversation_key,
                    message_id: message.id,
                    status: message.status,
                    delivered_at: message.delivered_at,
                    read_at: message.read_at,
                    changed: false,
                });
            }

            let mut updated = message;
            match target {
                MessageStatus::Delivered => {
                    updated.status = MessageStatus::Delivered;
                    updated.delivered_at = Some(Utc::now());
                }
                MessageStatus::Read => {
                    // A read may arrive before the delivery ack; jumping
                    // Sent -> Read directly is allowed and leaves
                    // delivered_at unset.
                    updated.status = MessageStatus::Read;
                    updated.read_at = Some(Utc::now());
                }
                MessageStatus::Sent => unreachable!("Sent is never a transition target"),
            }

            match store.update(updated.clone(), etag).await {
                Ok(_) => {
                    return Ok(ReceiptOutcome {
                        conversation_key: updated.conversation_key,
                        message_id: updated.id,
                        status: updated.status,
                        delivered_at: updated.delivered_at,
                        read_at: updated.read_at,
                        changed: true,
                    });
                }
                Err(StorageError::VersionConflict) if attempt + 1 < CAS_ATTEMPTS => {
                    tracing::debug!(
                        %conversation_key,
                        %message_id,
                        "receipt write raced, retrying"
                    );
                    continue;
                }
                Err(StorageError::VersionConflict) => return Err(AppError::Conflict),
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict)
    }
}
