use crate::error::Result;
use crate::models::Message;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, receiver_id, content, \
     message_type, media_url, media_type, is_read, created_at";

pub struct NewMessage<'a> {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: &'a str,
    pub message_type: &'a str,
    pub media_url: Option<&'a str>,
    pub media_type: Option<&'a str>,
}

/// Inserts the message and refreshes the conversation's `updated_at` in one
/// transaction, so the conversation list ordering can never miss a message.
pub async fn insert(pool: &PgPool, message: &NewMessage<'_>) -> Result<Message> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, Message>(&format!(
        "INSERT INTO messages
             (conversation_id, sender_id, receiver_id, content, message_type, media_url, media_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(message.conversation_id)
    .bind(message.sender_id)
    .bind(message.receiver_id)
    .bind(message.content)
    .bind(message.message_type)
    .bind(message.media_url)
    .bind(message.media_type)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
        .bind(message.conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}

pub async fn list_for_conversation(pool: &PgPool, conversation_id: Uuid) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE conversation_id = $1
         ORDER BY created_at"
    ))
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks messages *addressed to* the reader as read; the reader's own sent
/// messages are never touched.
pub async fn mark_read(pool: &PgPool, conversation_id: Uuid, reader_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE messages SET is_read = TRUE
         WHERE conversation_id = $1 AND receiver_id = $2 AND NOT is_read",
    )
    .bind(conversation_id)
    .bind(reader_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
