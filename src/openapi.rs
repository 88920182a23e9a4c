/// OpenAPI documentation for the chat service.
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chat Service API",
        version = "0.1.0",
        description = "Direct messaging: conversations, delivery receipts, and a live push channel",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Service health checks"),
        (name = "Conversations", description = "Conversation start and listing"),
        (name = "Messages", description = "Message send, history, and receipts"),
        (name = "WebSocket", description = "Real-time messaging via WebSocket"),
    ),
    components(schemas(
        crate::models::MessageView,
        crate::models::MessageStatus,
        crate::models::ConversationSummary,
        crate::routes::conversations::StartConversationRequest,
        crate::routes::conversations::StartConversationResponse,
        crate::routes::conversations::ParticipantView,
        crate::routes::messages::SendMessageRequest,
        crate::routes::messages::MarkStatusRequest,
        crate::routes::messages::StatusView,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_response_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc
            .components
            .as_ref()
            .map(|c| c.schemas.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        for name in [
            "MessageView",
            "ConversationSummary",
            "StartConversationResponse",
            "StatusView",
        ] {
            assert!(schemas.iter().any(|s| s == name), "missing schema {name}");
        }
    }
}
