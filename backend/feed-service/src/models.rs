use crate::error::{FeedError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const POST_TYPES: [&str; 5] = ["text", "image", "link", "event", "project"];

pub fn validate_post_type(post_type: &str) -> Result<()> {
    if POST_TYPES.contains(&post_type) {
        Ok(())
    } else {
        Err(FeedError::Validation(format!(
            "Unknown post type '{post_type}', expected one of {}",
            POST_TYPES.join(", ")
        )))
    }
}

/// A post together with its aggregate counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub post_type: String,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub is_public: bool,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_post_type() {
        for t in POST_TYPES {
            assert!(validate_post_type(t).is_ok());
        }
        assert!(validate_post_type("poll").is_err());
        assert!(validate_post_type("").is_err());
    }
}
