use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};

pub mod events;
pub mod handlers;
pub mod message_types;

/// Live subscription table: conversation key -> outbound channels of every
/// connection currently joined to that conversation. Owned by this module,
/// session-scoped, never persisted.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<String, Vec<UnboundedSender<Message>>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join an existing connection's outbound channel to a conversation
    /// group.
    pub async fn subscribe(&self, conversation_key: &str, tx: UnboundedSender<Message>) {
        let mut guard = self.inner.write().await;
        guard.entry(conversation_key.to_string()).or_default().push(tx);
    }

    /// Open a fresh subscription and hand back its receiving end.
    pub async fn add_subscriber(&self, conversation_key: &str) -> UnboundedReceiver<Message> {
        let (tx, rx) = unbounded_channel();
        self.subscribe(conversation_key, tx).await;
        rx
    }

    /// Fan a frame out to every member of the group. Send failures mean the
    /// peer is gone; those senders are pruned and nobody else is affected.
    pub async fn broadcast(&self, conversation_key: &str, msg: Message) {
        let mut guard = self.inner.write().await;
        if let Some(list) = guard.get_mut(conversation_key) {
            list.retain(|sender| sender.send(msg.clone()).is_ok());
        }
    }
}
