use crate::error::{FeedError, Result};
use crate::models::Post;
use crate::trending::{TRENDING_LIMIT, TRENDING_WINDOW_DAYS};
use sqlx::PgPool;
use uuid::Uuid;

/// Post columns plus the aggregate counters, for queries over `posts p`.
const POST_COLUMNS: &str = "p.id, p.author_id, p.title, p.content, p.post_type, \
     p.image_url, p.external_link, p.is_public, p.view_count, p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count";

pub struct NewPost<'a> {
    pub author_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub post_type: &'a str,
    pub image_url: Option<&'a str>,
    pub external_link: Option<&'a str>,
    pub is_public: bool,
}

pub async fn insert(pool: &PgPool, post: &NewPost<'_>) -> Result<Post> {
    let row = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (author_id, title, content, post_type, image_url, external_link, is_public)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, author_id, title, content, post_type, image_url, external_link,
                   is_public, view_count, created_at, updated_at,
                   0::BIGINT AS like_count, 0::BIGINT AS comment_count",
    )
    .bind(post.author_id)
    .bind(post.title)
    .bind(post.content)
    .bind(post.post_type)
    .bind(post.image_url)
    .bind(post.external_link)
    .bind(post.is_public)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>> {
    let row = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Retrieval counts as a view; the increment and the read are one statement.
/// Private posts are only visible to their author.
pub async fn retrieve(pool: &PgPool, post_id: Uuid, viewer_id: Uuid) -> Result<Option<Post>> {
    let row = sqlx::query_as::<_, Post>(
        "UPDATE posts AS p SET view_count = view_count + 1
         WHERE p.id = $1 AND (p.is_public OR p.author_id = $2)
         RETURNING p.id, p.author_id, p.title, p.content, p.post_type, p.image_url,
                   p.external_link, p.is_public, p.view_count, p.created_at, p.updated_at,
                   (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
                   (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count",
    )
    .bind(post_id)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Public posts plus the viewer's own private ones, newest first.
pub async fn list_visible(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         WHERE p.is_public OR p.author_id = $1
         ORDER BY p.created_at DESC"
    ))
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         WHERE p.author_id = $1
         ORDER BY p.created_at DESC"
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Posts by followed users and the viewer themselves, newest first.
pub async fn feed_for(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts p
         WHERE p.is_public
           AND (p.author_id = $1
                OR p.author_id IN
                   (SELECT followee_id FROM follows WHERE follower_id = $1))
         ORDER BY p.created_at DESC"
    ))
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Public posts from the last week ranked by engagement.
pub async fn trending(pool: &PgPool) -> Result<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(&format!(
        "SELECT * FROM (
             SELECT {POST_COLUMNS} FROM posts p
             WHERE p.is_public AND p.created_at > NOW() - make_interval(days => $1)
         ) ranked
         ORDER BY like_count + 2 * comment_count + view_count / 10 DESC
         LIMIT $2"
    ))
    .bind(TRENDING_WINDOW_DAYS as i32)
    .bind(TRENDING_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub struct UpdatePostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub is_public: Option<bool>,
}

/// Author-only update; anyone else gets a permission error.
pub async fn update(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    fields: &UpdatePostFields,
) -> Result<Post> {
    let existing = find_by_id(pool, post_id)
        .await?
        .ok_or(FeedError::PostNotFound)?;
    if existing.author_id != author_id {
        return Err(FeedError::Forbidden(
            "Only the author can edit this post".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, Post>(
        "UPDATE posts AS p SET
             title = COALESCE($3, title),
             content = COALESCE($4, content),
             image_url = COALESCE($5, image_url),
             external_link = COALESCE($6, external_link),
             is_public = COALESCE($7, is_public),
             updated_at = NOW()
         WHERE p.id = $1 AND p.author_id = $2
         RETURNING p.id, p.author_id, p.title, p.content, p.post_type, p.image_url,
                   p.external_link, p.is_public, p.view_count, p.created_at, p.updated_at,
                   (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
                   (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(&fields.image_url)
    .bind(&fields.external_link)
    .bind(fields.is_public)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, post_id: Uuid, author_id: Uuid) -> Result<()> {
    let existing = find_by_id(pool, post_id)
        .await?
        .ok_or(FeedError::PostNotFound)?;
    if existing.author_id != author_id {
        return Err(FeedError::Forbidden(
            "Only the author can delete this post".to_string(),
        ));
    }

    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(())
}
