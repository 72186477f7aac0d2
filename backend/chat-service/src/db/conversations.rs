use crate::error::Result;
use crate::models::{pair_key, Conversation, ConversationSummary};
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent under concurrent callers: the conflict on
/// `(user_low, user_high)` is resolved inside the statement, so two
/// simultaneous sends can never create two conversations. The no-op
/// `DO UPDATE` exists so the statement always returns the row.
pub async fn get_or_create(pool: &PgPool, a: Uuid, b: Uuid) -> Result<Conversation> {
    let (low, high) = pair_key(a, b);

    let row = sqlx::query_as::<_, Conversation>(
        "INSERT INTO conversations (user_low, user_high)
         VALUES ($1, $2)
         ON CONFLICT (user_low, user_high)
             DO UPDATE SET user_low = conversations.user_low
         RETURNING id, user_low, user_high, created_at, updated_at",
    )
    .bind(low)
    .bind(high)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// The caller's conversations, most recently active first, each with the
/// other participant and a last-message summary.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
    let rows = sqlx::query_as::<_, ConversationSummary>(
        "SELECT c.id,
                CASE WHEN c.user_low = $1 THEN c.user_high ELSE c.user_low END AS other_user_id,
                u.username AS other_username,
                m.content AS last_message,
                m.message_type AS last_message_type,
                m.created_at AS last_message_at,
                (SELECT COUNT(*) FROM messages
                 WHERE conversation_id = c.id AND receiver_id = $1 AND NOT is_read) AS unread_count,
                c.updated_at
         FROM conversations c
         LEFT JOIN users u
             ON u.id = CASE WHEN c.user_low = $1 THEN c.user_high ELSE c.user_low END
         LEFT JOIN LATERAL (
             SELECT content, message_type, created_at FROM messages
             WHERE conversation_id = c.id
             ORDER BY created_at DESC
             LIMIT 1
         ) m ON TRUE
         WHERE c.user_low = $1 OR c.user_high = $1
         ORDER BY c.updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
