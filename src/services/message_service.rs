use crate::error::{AppError, AppResult};
use crate::models::conversation::KEY_SEPARATOR;
use crate::models::{conversation_key, Message};
use crate::services::user_directory::{display_name_or_placeholder, UserDirectory};
use crate::storage::MessageStore;

pub struct MessageService;

impl MessageService {
    /// Validate a participant id as usable inside a conversation key.
    pub fn validate_participant_id(id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::BadRequest("participant id must not be empty".into()));
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(AppError::BadRequest(format!(
                "participant id must not contain '{KEY_SEPARATOR}'"
            )));
        }
        Ok(())
    }

    /// Append a new message. Validates input, snapshots the sender's display
    /// name, assigns id/timestamp, writes through the store and returns the
    /// created row.
    pub async fn append(
        store: &dyn MessageStore,
        directory: &dyn UserDirectory,
        sender_id: &str,
        receiver_id: &str,
        body: &str,
    ) -> AppResult<Message> {
        Self::validate_participant_id(sender_id)?;
        Self::validate_participant_id(receiver_id)?;
        if sender_id == receiver_id {
            return Err(AppError::BadRequest(
                "cannot start a conversation with yourself".into(),
            ));
        }
        if body.trim().is_empty() {
            return Err(AppError::BadRequest("message body must not be empty".into()));
        }

        let sender_name = display_name_or_placeholder(directory, sender_id).await;
        let message = Message::new(
            conversation_key(sender_id, receiver_id),
            sender_id.to_string(),
            sender_name,
            receiver_id.to_string(),
            body.to_string(),
        );
        store.insert(message.clone()).await?;
        tracing::debug!(
            conversation_key = %message.conversation_key,
            message_id = %message.id,
            "message appended"
        );
        Ok(message)
    }

    /// Full history of the conversation between two users, oldest first.
    pub async fn list_conversation(
        store: &dyn MessageStore,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Vec<Message>> {
        let key = conversation_key(user_a, user_b);
        Ok(store.list_partition(&key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user_directory::{InMemoryUserDirectory, UNKNOWN_USER};
    use crate::storage::InMemoryMessageStore;

    async fn fixtures() -> (InMemoryMessageStore, InMemoryUserDirectory) {
        let store = InMemoryMessageStore::new();
        let directory = InMemoryUserDirectory::new();
        directory.register("alice", "Alice").await;
        directory.register("bob", "Bob").await;
        (store, directory)
    }

    #[tokio::test]
    async fn append_snapshots_sender_name() {
        let (store, directory) = fixtures().await;
        let m = MessageService::append(&store, &directory, "alice", "bob", "hello")
            .await
            .unwrap();
        assert_eq!(m.sender_name, "Alice");
        assert_eq!(m.conversation_key, "chat:alice:bob");
    }

    #[tokio::test]
    async fn append_rejects_blank_body() {
        let (store, directory) = fixtures().await;
        for body in ["", "   ", "\n\t"] {
            let err = MessageService::append(&store, &directory, "alice", "bob", body)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "body {body:?}");
        }
    }

    #[tokio::test]
    async fn append_rejects_bad_participant_ids() {
        let (store, directory) = fixtures().await;
        assert!(MessageService::append(&store, &directory, "", "bob", "hi")
            .await
            .is_err());
        assert!(MessageService::append(&store, &directory, "a:b", "bob", "hi")
            .await
            .is_err());
        assert!(MessageService::append(&store, &directory, "alice", "alice", "hi")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn unknown_sender_gets_placeholder_name() {
        let (store, directory) = fixtures().await;
        let m = MessageService::append(&store, &directory, "ghost", "bob", "boo")
            .await
            .unwrap();
        assert_eq!(m.sender_name, UNKNOWN_USER);
    }

    #[tokio::test]
    async fn listing_is_symmetric_between_participants() {
        let (store, directory) = fixtures().await;
        MessageService::append(&store, &directory, "alice", "bob", "one")
            .await
            .unwrap();
        MessageService::append(&store, &directory, "bob", "alice", "two")
            .await
            .unwrap();

        let from_alice = MessageService::list_conversation(&store, "alice", "bob")
            .await
            .unwrap();
        let from_bob = MessageService::list_conversation(&store, "bob", "alice")
            .await
            .unwrap();
        assert_eq!(from_alice.len(), 2);
        assert_eq!(
            from_alice.iter().map(|m| m.id).collect::<Vec<_>>(),
            from_bob.iter().map(|m| m.id).collect::<Vec<_>>()
        );
    }
}
