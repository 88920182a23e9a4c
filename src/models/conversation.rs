use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::message::MessageStatus;

/// Prefix and separator of conversation keys. The derived key doubles as the
/// storage partition and the live-channel group name, so both paths must go
/// through [`conversation_key`].
pub const KEY_PREFIX: &str = "chat";
pub const KEY_SEPARATOR: char = ':';

/// Canonical key for the conversation between two participants. Symmetric:
/// the pair is sorted lexicographically before joining, so the argument order
/// never matters.
pub fn conversation_key(a: &str, b: &str) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{KEY_PREFIX}{KEY_SEPARATOR}{lo}{KEY_SEPARATOR}{hi}")
}

/// Decompose a conversation key back into its two participant ids. Returns
/// `None` for strings that were not produced by [`conversation_key`].
pub fn participants(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix(KEY_PREFIX)?.strip_prefix(KEY_SEPARATOR)?;
    let (lo, hi) = rest.split_once(KEY_SEPARATOR)?;
    if lo.is_empty() || hi.is_empty() || hi.contains(KEY_SEPARATOR) {
        return None;
    }
    Some((lo, hi))
}

/// One row of the conversation list, as seen by a specific viewer. Derived on
/// every query; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummary {
    pub conversation_key: String,
    pub other_user_id: String,
    pub other_user_name: String,
    /// Counterparty avatar; empty string when unset or the lookup missed.
    pub other_user_image_url: String,
    pub last_message: String,
    pub last_sender_id: String,
    pub last_sender_name: String,
    pub last_message_status: MessageStatus,
    pub timestamp: DateTime<Utc>,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_symmetric() {
        assert_eq!(conversation_key("alice", "bob"), conversation_key("bob", "alice"));
    }

    #[test]
    fn key_sorts_participants() {
        assert_eq!(conversation_key("bob", "alice"), "chat:alice:bob");
        assert_eq!(conversation_key("alice", "bob"), "chat:alice:bob");
    }

    #[test]
    fn distinct_pairs_get_distinct_keys() {
        assert_ne!(
            conversation_key("alice", "bob"),
            conversation_key("alice", "carol")
        );
    }

    #[test]
    fn participants_round_trip() {
        let key = conversation_key("bob", "alice");
        assert_eq!(participants(&key), Some(("alice", "bob")));
    }

    #[test]
    fn participants_rejects_foreign_strings() {
        assert_eq!(participants("messages:alice:bob"), None);
        assert_eq!(participants("chat:alice"), None);
        assert_eq!(participants("chat:alice:"), None);
        assert_eq!(participants("chat:a:b:c"), None);
    }
}
