use axum::middleware;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::state::AppState;
use crate::websocket::handlers::ws_handler;

pub mod conversations;
use conversations::{list_conversations, start_conversation};
pub mod messages;
use messages::{list_messages, mark_delivered, mark_read, send_message};

// OpenAPI endpoint handler
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}

// Lightweight health/metrics stubs for probes and monitoring.
async fn metrics() -> String {
    json!({
        "service": "chat-service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
    .to_string()
}

pub fn build_router(state: AppState) -> Router {
    // Service introspection endpoints stay public for healthchecks.
    let introspection = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/metrics", get(metrics))
        .route(crate::openapi::ApiDoc::openapi_json_path(), get(openapi_json));

    let api_v1 = Router::new()
        .route(
            "/conversations",
            post(start_conversation).get(list_conversations),
        )
        .route("/messages", post(send_message))
        .route("/messages/:other_user_id", get(list_messages))
        .route("/messages/:id/delivered", post(mark_delivered))
        .route("/messages/:id/read", post(mark_read))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ))
        // The websocket endpoint authenticates during the upgrade handshake
        // (token may arrive as a query parameter), so it sits outside the
        // header-based auth layer.
        .route("/ws", get(ws_handler));

    let router = introspection.merge(Router::new().nest("/api/v1", api_v1));

    crate::middleware::with_defaults(router).with_state(state)
}
