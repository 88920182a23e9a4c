use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Message;

pub mod memory;

pub use memory::InMemoryMessageStore;

/// Opaque row version used for optimistic concurrency. Every successful
/// update bumps it; updates carrying a stale value are rejected.
pub type Etag = u64;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("row not found")]
    NotFound,

    #[error("row version conflict")]
    VersionConflict,

    #[error("row already exists")]
    AlreadyExists,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The one shared mutable resource of the chat core: a table of messages
/// keyed by `(conversation_key, message_id)` with per-row version checks.
/// Backends must make `update` a compare-and-swap against the supplied etag.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durable append. The `(conversation_key, id)` pair must be new.
    async fn insert(&self, message: Message) -> StorageResult<()>;

    /// Point read, returning the row together with its current etag.
    async fn get(&self, conversation_key: &str, id: Uuid) -> StorageResult<(Message, Etag)>;

    /// Replace a row if and only if `etag` still matches. Returns the new
    /// etag on success.
    async fn update(&self, message: Message, etag: Etag) -> StorageResult<Etag>;

    /// All messages of one conversation, ascending by `created_at` (ties
    /// broken by id). Unpaginated; scale ceiling, not a correctness issue.
    async fn list_partition(&self, conversation_key: &str) -> StorageResult<Vec<Message>>;

    /// Every message in which `user_id` occupies the sender or receiver
    /// slot, across all conversations. Aggregator use only.
    async fn scan_for_participant(&self, user_id: &str) -> StorageResult<Vec<Message>>;
}
