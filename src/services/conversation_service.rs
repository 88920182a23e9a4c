use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{conversation_key, ConversationSummary, Message, MessageStatus};
use crate::services::message_service::MessageService;
use crate::services::user_directory::{profile_or_placeholder, UserDirectory};
use crate::storage::MessageStore;

#[derive(Debug, Clone)]
pub struct ConversationStart {
    pub conversation_key: String,
    pub participants: Vec<(String, String)>,
}

pub struct ConversationService;

impl ConversationService {
    /// Validate both participants and hand back the canonical key. The one
    /// place where an absent directory entry is an error rather than a
    /// placeholder.
    pub async fn start(
        directory: &dyn UserDirectory,
        user_id: &str,
        other_user_id: &str,
    ) -> AppResult<ConversationStart> {
        MessageService::validate_participant_id(user_id)?;
        MessageService::validate_participant_id(other_user_id)?;
        if user_id == other_user_id {
            return Err(AppError::BadRequest(
                "cannot start a conversation with yourself".into(),
            ));
        }

        let mut participants = Vec::with_capacity(2);
        for id in [user_id, other_user_id] {
            let profile = directory
                .get_by_id(id)
                .await
                .map_err(|e| AppError::Unavailable(e.to_string()))?
                .ok_or(AppError::NotFound)?;
            participants.push((profile.id, profile.display_name));
        }

        Ok(ConversationStart {
            conversation_key: conversation_key(user_id, other_user_id),
            participants,
        })
    }

    /// The viewer's conversation list, newest first. Recomputed from a full
    /// message scan on every call; there is deliberately no cached aggregate
    /// to drift out of sync.
    pub async fn list_conversations(
        store: &dyn MessageStore,
        directory: &dyn UserDirectory,
        viewer_id: &str,
    ) -> AppResult<Vec<ConversationSummary>> {
        let messages = store.scan_for_participant(viewer_id).await?;

        struct Group {
            latest: Message,
            unread: u32,
        }

        let mut groups: HashMap<String, Group> = HashMap::new();
        for message in messages {
            let other = if message.sender_id == viewer_id {
                message.receiver_id.clone()
            } else {
                message.sender_id.clone()
            };

            let from_counterparty = message.sender_id == other;
            let unread_here = u32::from(from_counterparty && message.status != MessageStatus::Read);

            match groups.entry(other) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let group = entry.get_mut();
                    group.unread += unread_here;
                    if message.created_at > group.latest.created_at {
                        group.latest = message;
                    }
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(Group {
                        latest: message,
                        unread: unread_here,
                    });
                }
            }
        }

        let mut summaries = Vec::with_capacity(groups.len());
        for (other_user_id, group) in groups {
            let other = profile_or_placeholder(directory, &other_user_id).await;
            summaries.push(ConversationSummary {
                conversation_key: group.latest.conversation_key.clone(),
                other_user_id,
                other_user_name: other.display_name,
                other_user_image_url: other.profile_image_url,
                last_message: group.latest.body.clone(),
                last_sender_id: group.latest.sender_id.clone(),
                last_sender_name: group.latest.sender_name.clone(),
                last_message_status: group.latest.status,
                timestamp: group.latest.created_at,
                unread_count: group.unread,
            });
        }
        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }
}
