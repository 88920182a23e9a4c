//! Conversation aggregation over the HTTP surface: recency ordering, unread
//! counting, and placeholder names for unknown counterparties.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use chat_service::models::{ConversationSummary, MessageView};

use common::{authed_request, json_body, send, test_router, test_state};

async fn post_message(
    router: &axum::Router,
    from: &str,
    to: &str,
    body: &str,
) -> MessageView {
    let response = send(
        router,
        authed_request(
            "POST",
            "/api/v1/messages",
            from,
            Some(json!({"recipient_id": to, "body": body})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

async fn conversations_for(router: &axum::Router, user: &str) -> Vec<ConversationSummary> {
    let response = send(
        router,
        authed_request("GET", "/api/v1/conversations", user, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn conversation_rows_carry_counterparty_avatar() {
    let router = test_router(test_state().await);
    post_message(&router, "alice", "bob", "hi").await;

    let for_bob = conversations_for(&router, "bob").await;
    assert_eq!(
        for_bob[0].other_user_image_url,
        "https://cdn.example/alice.png"
    );

    // bob has no avatar on file
    let for_alice = conversations_for(&router, "alice").await;
    assert_eq!(for_alice[0].other_user_image_url, "");
}

#[tokio::test]
async fn latest_message_wins_and_unread_counts_counterparty_only() {
    let router = test_router(test_state().await);

    post_message(&router, "alice", "bob", "hi").await;
    post_message(&router, "bob", "alice", "hey").await;
    post_message(&router, "alice", "bob", "you there").await;

    let for_alice = conversations_for(&router, "alice").await;
    assert_eq!(for_alice.len(), 1);
    let conv = &for_alice[0];
    assert_eq!(conv.other_user_id, "bob");
    assert_eq!(conv.other_user_name, "Bob");
    assert_eq!(conv.last_message, "you there");
    assert_eq!(conv.last_sender_id, "alice");
    assert_eq!(conv.unread_count, 1);

    let for_bob = conversations_for(&router, "bob").await;
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].unread_count, 2);
}

#[tokio::test]
async fn conversations_are_ordered_by_recency() {
    let router = test_router(test_state().await);

    post_message(&router, "alice", "bob", "first thread").await;
    post_message(&router, "carol", "alice", "second thread").await;

    let for_alice = conversations_for(&router, "alice").await;
    assert_eq!(for_alice.len(), 2);
    assert_eq!(for_alice[0].other_user_id, "carol");
    assert_eq!(for_alice[1].other_user_id, "bob");
    assert!(for_alice[0].timestamp >= for_alice[1].timestamp);
}

#[tokio::test]
async fn reading_updates_unread_count() {
    let router = test_router(test_state().await);

    let message = post_message(&router, "alice", "bob", "ping").await;
    let response = send(
        &router,
        authed_request(
            "POST",
            &format!("/api/v1/messages/{}/read", message.id),
            "bob",
            Some(json!({"conversation_key": message.conversation_key})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let for_bob = conversations_for(&router, "bob").await;
    assert_eq!(for_bob[0].unread_count, 0);
}

#[tokio::test]
async fn unknown_counterparty_shows_placeholder_name() {
    let router = test_router(test_state().await);

    // "ghost" holds a valid token but has no directory profile.
    post_message(&router, "ghost", "alice", "boo").await;

    let for_alice = conversations_for(&router, "alice").await;
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].other_user_name, "Unknown");
    assert_eq!(for_alice[0].unread_count, 1);
}

#[tokio::test]
async fn empty_history_yields_empty_list() {
    let router = test_router(test_state().await);
    assert!(conversations_for(&router, "alice").await.is_empty());
}
