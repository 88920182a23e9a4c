pub mod conversation;
pub mod message;

pub use conversation::{conversation_key, participants, ConversationSummary};
pub use message::{Message, MessageStatus, MessageView};
