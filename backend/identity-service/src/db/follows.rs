/// Follow-edge operations. The edge table is asymmetric: following does not
/// imply being followed back.
use crate::error::{IdentityError, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent create; returns true if a new edge was inserted.
pub async fn create(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    if follower_id == followee_id {
        return Err(IdentityError::Validation(
            "Cannot follow yourself".to_string(),
        ));
    }

    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (follower_id, followee_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if an edge was removed.
pub async fn delete(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let affected = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

pub async fn is_following(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
