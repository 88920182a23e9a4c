#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use chat_service::config::Config;
use chat_service::middleware::auth::Claims;
use chat_service::routes;
use chat_service::services::user_directory::{InMemoryUserDirectory, UserDirectory};
use chat_service::state::AppState;
use chat_service::storage::{InMemoryMessageStore, MessageStore};
use chat_service::websocket::ConnectionRegistry;

pub const JWT_SECRET: &str = "test-secret";

/// App state over in-memory backends, directory seeded with three users.
pub async fn test_state() -> AppState {
    let directory = InMemoryUserDirectory::new();
    directory
        .register_with_image("alice", "Alice", "https://cdn.example/alice.png")
        .await;
    for (id, name) in [("bob", "Bob"), ("carol", "Carol")] {
        directory.register(id, name).await;
    }

    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let users: Arc<dyn UserDirectory> = Arc::new(directory);

    AppState {
        store,
        users,
        registry: ConnectionRegistry::new(),
        config: Arc::new(Config {
            bind_addr: "127.0.0.1".into(),
            port: 0,
            jwt_secret: JWT_SECRET.into(),
        }),
    }
}

pub fn test_router(state: AppState) -> Router {
    routes::build_router(state)
}

pub fn bearer_token(sub: &str) -> String {
    let claims = Claims {
        sub: sub.into(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn authed_request(method: &str, uri: &str, user: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer_token(user)));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.unwrap()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
