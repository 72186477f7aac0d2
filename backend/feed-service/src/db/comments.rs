use crate::error::{FeedError, Result};
use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, post_id, author_id, content, parent_id, created_at, updated_at";

pub async fn insert(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
    parent_id: Option<Uuid>,
) -> Result<Comment> {
    if let Some(parent) = parent_id {
        let parent_ok = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND post_id = $2)",
        )
        .bind(parent)
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        if !parent_ok {
            return Err(FeedError::Validation(
                "Parent comment does not belong to this post".to_string(),
            ));
        }
    }

    let row = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (post_id, author_id, content, parent_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {COMMENT_COLUMNS}"
    ))
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// All comments on a post in creation order; threading is the client's job
/// via `parent_id`.
pub async fn list_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY created_at"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn delete(pool: &PgPool, comment_id: Uuid, author_id: Uuid) -> Result<()> {
    let existing = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
    ))
    .bind(comment_id)
    .fetch_optional(pool)
    .await?
    .ok_or(FeedError::CommentNotFound)?;

    if existing.author_id != author_id {
        return Err(FeedError::Forbidden(
            "Only the author can delete this comment".to_string(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(())
}
