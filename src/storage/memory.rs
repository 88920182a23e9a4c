use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Message;
use crate::storage::{Etag, MessageStore, StorageError, StorageResult};

#[derive(Debug, Clone)]
struct Row {
    message: Message,
    etag: Etag,
}

/// In-memory table backend: a partition map with per-row etag counters.
/// Reference implementation for tests and single-node deployments; cloud
/// table backends plug in behind the same trait.
#[derive(Default, Clone)]
pub struct InMemoryMessageStore {
    partitions: Arc<RwLock<HashMap<String, HashMap<Uuid, Row>>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: Message) -> StorageResult<()> {
        let mut guard = self.partitions.write().await;
        let partition = guard.entry(message.conversation_key.clone()).or_default();
        if partition.contains_key(&message.id) {
            return Err(StorageError::AlreadyExists);
        }
        partition.insert(message.id, Row { message, etag: 1 });
        Ok(())
    }

    async fn get(&self, conversation_key: &str, id: Uuid) -> StorageResult<(Message, Etag)> {
        let guard = self.partitions.read().await;
        guard
            .get(conversation_key)
            .and_then(|partition| partition.get(&id))
            .map(|row| (row.message.clone(), row.etag))
            .ok_or(StorageError::NotFound)
    }

    async fn update(&self, message: Message, etag: Etag) -> StorageResult<Etag> {
        let mut guard = self.partitions.write().await;
        let row = guard
            .get_mut(&message.conversation_key)
            .and_then(|partition| partition.get_mut(&message.id))
            .ok_or(StorageError::NotFound)?;
        if row.etag != etag {
            return Err(StorageError::VersionConflict);
        }
        row.message = message;
        row.etag += 1;
        Ok(row.etag)
    }

    async fn list_partition(&self, conversation_key: &str) -> StorageResult<Vec<Message>> {
        let guard = self.partitions.read().await;
        let mut messages: Vec<Message> = guard
            .get(conversation_key)
            .map(|partition| partition.values().map(|row| row.message.clone()).collect())
            .unwrap_or_default();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn scan_for_participant(&self, user_id: &str) -> StorageResult<Vec<Message>> {
        let guard = self.partitions.read().await;
        let messages = guard
            .values()
            .flat_map(|partition| partition.values())
            .filter(|row| row.message.sender_id == user_id || row.message.receiver_id == user_id)
            .map(|row| row.message.clone())
            .collect();
        Ok(messages)
    }
}
