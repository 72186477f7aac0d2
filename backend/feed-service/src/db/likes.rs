use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent; returns whether a new like row was created.
pub async fn like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO likes (post_id, user_id) VALUES ($1, $2)
         ON CONFLICT (post_id, user_id) DO NOTHING
         RETURNING id",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent; returns whether a like row was removed.
pub async fn unlike(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
