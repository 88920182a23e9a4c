use axum::http;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::state::AppState;

/// Trace every request through the chat surface. Websocket upgrades are
/// flagged in the span since they stay open long after `on_response` fires.
pub fn add_tracing(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<_>| {
                let websocket = req
                    .headers()
                    .get(http::header::UPGRADE)
                    .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"websocket"));
                tracing::span!(
                    Level::INFO,
                    "chat_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    websocket,
                )
            })
            .on_response(
                |res: &http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                    let elapsed_ms = latency.as_millis() as u64;
                    if res.status().is_server_error() {
                        tracing::warn!(status = %res.status(), elapsed_ms, "request failed");
                    } else {
                        tracing::info!(status = %res.status(), elapsed_ms, "request completed");
                    }
                },
            ),
    )
}
