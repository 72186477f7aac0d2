use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account row. `password_hash` is NULL for Google-created accounts.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub department: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile_picture_url: Option<String>,
    pub google_id: Option<String>,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile shape returned by the API — never exposes credentials or tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            department: u.department,
            graduation_year: u.graduation_year,
            profile_picture_url: u.profile_picture_url,
            is_verified: u.is_verified,
        }
    }
}
