use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::models::ConversationSummary;
use crate::services::conversation_service::ConversationService;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StartConversationRequest {
    pub other_user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantView {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartConversationResponse {
    pub conversation_key: String,
    pub participants: Vec<ParticipantView>,
}

/// Validate both participants and return the canonical conversation key the
/// client should join on the live channel.
pub async fn start_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<StartConversationRequest>,
) -> AppResult<Json<StartConversationResponse>> {
    let started =
        ConversationService::start(state.users.as_ref(), &user.id, &body.other_user_id).await?;
    Ok(Json(StartConversationResponse {
        conversation_key: started.conversation_key,
        participants: started
            .participants
            .into_iter()
            .map(|(id, name)| ParticipantView { id, name })
            .collect(),
    }))
}

/// The caller's conversation list, newest first, recomputed per request.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let summaries =
        ConversationService::list_conversations(state.store.as_ref(), state.users.as_ref(), &user.id)
            .await?;
    Ok(Json(summaries))
}
