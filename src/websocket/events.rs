//! Live-channel event dispatch.
//!
//! Inbound events reuse the exact services behind the request/response
//! surface, then fan the result out through the [`ConnectionRegistry`].
//! Failures are reported only to the acting connection; a broadcast that
//! cannot reach one group member never aborts delivery to the others and
//! never rolls back the store write.

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::AppError;
use crate::models::{conversation_key, MessageView};
use crate::services::message_service::MessageService;
use crate::services::receipt_service::{ReceiptOutcome, ReceiptService};
use crate::state::AppState;
use crate::websocket::message_types::{WsInboundEvent, WsOutboundEvent};
use crate::websocket::ConnectionRegistry;

pub async fn dispatch(
    state: &AppState,
    user_id: &str,
    event: WsInboundEvent,
    tx: &UnboundedSender<Message>,
) {
    match event {
        WsInboundEvent::Join { other_user_id } => {
            let key = conversation_key(user_id, &other_user_id);
            state.registry.subscribe(&key, tx.clone()).await;
            tracing::debug!(conversation_key = %key, %user_id, "connection joined group");
        }
        WsInboundEvent::Send {
            other_user_id,
            body,
        } => {
            match MessageService::append(
                state.store.as_ref(),
                state.users.as_ref(),
                user_id,
                &other_user_id,
                &body,
            )
            .await
            {
                Ok(message) => {
                    broadcast_new_message(&state.registry, MessageView::from(message)).await;
                }
                Err(e) => send_error(tx, &e),
            }
        }
        WsInboundEvent::MarkDelivered {
            message_id,
            conversation_key,
        } => {
            match ReceiptService::mark_delivered(
                state.store.as_ref(),
                &conversation_key,
                message_id,
                user_id,
            )
            .await
            {
                Ok(outcome) => broadcast_status_update(&state.registry, &outcome).await,
                Err(e) => send_error(tx, &e),
            }
        }
        WsInboundEvent::MarkRead {
            message_id,
            conversation_key,
        } => {
            match ReceiptService::mark_read(
                state.store.as_ref(),
                &conversation_key,
                message_id,
                user_id,
            )
            .await
            {
                Ok(outcome) => broadcast_status_update(&state.registry, &outcome).await,
                Err(e) => send_error(tx, &e),
            }
        }
    }
}

/// Push a freshly created message to everyone joined to its conversation.
/// Shared by the live channel and the HTTP send path.
pub async fn broadcast_new_message(registry: &ConnectionRegistry, view: MessageView) {
    let key = view.conversation_key.clone();
    let event = WsOutboundEvent::MessageReceived { message: view };
    broadcast_event(registry, &key, &event).await;
}

/// Push a status transition to the conversation group. No-op transitions
/// (self-acks, idempotent re-acks) stay quiet.
pub async fn broadcast_status_update(registry: &ConnectionRegistry, outcome: &ReceiptOutcome) {
    if !outcome.changed {
        return;
    }
    let event = WsOutboundEvent::StatusUpdated {
        message_id: outcome.message_id,
        conversation_key: outcome.conversation_key.clone(),
        status: outcome.status,
        delivered_at: outcome.delivered_at,
        read_at: outcome.read_at,
    };
    broadcast_event(registry, &outcome.conversation_key, &event).await;
}

async fn broadcast_event(registry: &ConnectionRegistry, key: &str, event: &WsOutboundEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => registry.broadcast(key, Message::Text(payload)).await,
        Err(e) => tracing::error!(conversation_key = %key, error = %e, "event serialization failed"),
    }
}

/// Report a failure back to the acting connection only.
pub fn send_error(tx: &UnboundedSender<Message>, err: &AppError) {
    let event = WsOutboundEvent::Error {
        message: err.to_string(),
    };
    if let Ok(payload) = serde_json::to_string(&event) {
        let _ = tx.send(Message::Text(payload));
    }
}
