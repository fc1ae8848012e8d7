//! Chat message model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sisfun_core::types::{DbId, Timestamp};

/// A row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub body: String,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a chat message. The body is already validated.
#[derive(Debug, Clone)]
pub struct CreateChatMessage {
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub body: String,
}

/// Unread message count from one sender.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnreadCount {
    pub sender_id: DbId,
    pub count: i64,
}

/// A user that can be messaged.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatContact {
    pub id: DbId,
    pub username: String,
    pub role: String,
}

/// Paging parameters for a conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
