//! Repository for the `chat_messages` table.

use sqlx::PgPool;
use sisfun_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use sisfun_core::types::DbId;

use crate::models::chat::{
    ChatContact, ChatMessage, ConversationQuery, CreateChatMessage, UnreadCount,
};

const COLUMNS: &str = "id, sender_id, recipient_id, body, read_at, created_at";

/// Provides storage for one-to-one chat messages.
pub struct ChatRepo;

impl ChatRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (sender_id, recipient_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.sender_id)
            .bind(input.recipient_id)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Messages exchanged between two users, oldest first.
    ///
    /// The page is taken from the newest end so `offset = 0` always holds the
    /// most recent messages.
    pub async fn conversation(
        pool: &PgPool,
        user_a: DbId,
        user_b: DbId,
        params: &ConversationQuery,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT {COLUMNS} FROM chat_messages
                WHERE (sender_id = $1 AND recipient_id = $2)
                   OR (sender_id = $2 AND recipient_id = $1)
                ORDER BY created_at DESC, id DESC
                LIMIT $3 OFFSET $4
             ) page
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_a)
            .bind(user_b)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark every unread message from `sender_id` to `recipient_id` as read.
    /// Returns how many rows changed.
    pub async fn mark_read(
        pool: &PgPool,
        recipient_id: DbId,
        sender_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_messages SET read_at = NOW()
             WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL",
        )
        .bind(recipient_id)
        .bind(sender_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Unread message counts for `recipient_id`, grouped by sender.
    pub async fn unread_counts(
        pool: &PgPool,
        recipient_id: DbId,
    ) -> Result<Vec<UnreadCount>, sqlx::Error> {
        sqlx::query_as::<_, UnreadCount>(
            "SELECT sender_id, COUNT(*)::BIGINT AS count
             FROM chat_messages
             WHERE recipient_id = $1 AND read_at IS NULL
             GROUP BY sender_id
             ORDER BY sender_id",
        )
        .bind(recipient_id)
        .fetch_all(pool)
        .await
    }

    /// Active users other than `exclude_user_id`, ordered by username.
    pub async fn contacts(
        pool: &PgPool,
        exclude_user_id: DbId,
    ) -> Result<Vec<ChatContact>, sqlx::Error> {
        sqlx::query_as::<_, ChatContact>(
            "SELECT u.id, u.username, r.name AS role
             FROM users u JOIN roles r ON r.id = u.role_id
             WHERE u.is_active AND u.id <> $1
             ORDER BY u.username ASC",
        )
        .bind(exclude_user_id)
        .fetch_all(pool)
        .await
    }
}
