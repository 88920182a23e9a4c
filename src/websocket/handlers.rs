use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::middleware::auth::authenticate_ws;
use crate::state::AppState;
use crate::websocket::events;
use crate::websocket::message_types::WsInboundEvent;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let user = match authenticate_ws(&state.config.jwt_secret, params.token.as_deref(), &headers) {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "websocket connection rejected");
            return axum::http::StatusCode::UNAUTHORIZED.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, user.id, socket))
}

async fn handle_socket(state: AppState, user_id: String, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();

    // Single outbound channel per connection; every group this connection
    // joins holds a clone of the sender. When the socket dies the pump
    // drops the receiver and the registry prunes the stale senders on the
    // next broadcast.
    let (tx, mut rx) = unbounded_channel::<Message>();

    let pump = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    debug!(%user_id, "websocket connected");

    while let Some(incoming) = stream.next().await {
        match incoming {
            Ok(Message::Text(text)) => match serde_json::from_str::<WsInboundEvent>(&text) {
                Ok(event) => events::dispatch(&state, &user_id, event, &tx).await,
                Err(_) => events::send_error(
                    &tx,
                    &AppError::BadRequest("unrecognized event payload".into()),
                ),
            },
            Ok(Message::Close(_)) | Err(_) => break,
            // Ping/pong handled by the framework; binary frames ignored.
            Ok(_) => {}
        }
    }

    // Disconnect stops future pushes to this connection; in-flight store
    // writes are unaffected.
    drop(tx);
    pump.abort();
    debug!(%user_id, "websocket disconnected");
}
