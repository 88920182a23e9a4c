pub mod conversation_service;
pub mod message_service;
pub mod receipt_service;
pub mod user_directory;
