use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::models::{MessageStatus, MessageView};
use crate::services::message_service::MessageService;
use crate::services::receipt_service::{ReceiptOutcome, ReceiptService};
use crate::state::AppState;
use crate::websocket::events;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    pub recipient_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkStatusRequest {
    pub conversation_key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusView {
    pub message_id: Uuid,
    pub conversation_key: String,
    pub status: MessageStatus,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    /// False when the call was a no-op (self-ack or repeat ack).
    pub changed: bool,
}

impl From<ReceiptOutcome> for StatusView {
    fn from(outcome: ReceiptOutcome) -> Self {
        Self {
            message_id: outcome.message_id,
            conversation_key: outcome.conversation_key,
            status: outcome.status,
            delivered_at: outcome.delivered_at,
            read_at: outcome.read_at,
            changed: outcome.changed,
        }
    }
}

/// Create a message and push it to any connections joined to the
/// conversation's live group.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<MessageView>> {
    let message = MessageService::append(
        state.store.as_ref(),
        state.users.as_ref(),
        &user.id,
        &body.recipient_id,
        &body.body,
    )
    .await?;
    let view = MessageView::from(message);
    events::broadcast_new_message(&state.registry, view.clone()).await;
    Ok(Json(view))
}

/// Full history with the given counterparty, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(other_user_id): Path<String>,
) -> AppResult<Json<Vec<MessageView>>> {
    let messages =
        MessageService::list_conversation(state.store.as_ref(), &user.id, &other_user_id).await?;
    Ok(Json(messages.into_iter().map(MessageView::from).collect()))
}

pub async fn mark_delivered(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<MarkStatusRequest>,
) -> AppResult<Json<StatusView>> {
    let outcome = ReceiptService::mark_delivered(
        state.store.as_ref(),
        &body.conversation_key,
        id,
        &user.id,
    )
    .await?;
    events::broadcast_status_update(&state.registry, &outcome).await;
    Ok(Json(outcome.into()))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<MarkStatusRequest>,
) -> AppResult<Json<StatusView>> {
    let outcome =
        ReceiptService::mark_read(state.store.as_ref(), &body.conversation_key, id, &user.id)
            .await?;
    events::broadcast_status_update(&state.registry, &outcome).await;
    Ok(Json(outcome.into()))
}
