/// User database operations for identity-service
use crate::error::{IdentityError, Result};
use crate::models::User;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, password_hash, \
     department, graduation_year, profile_picture_url, google_id, is_verified, \
     verification_token, reset_password_token, reset_password_expires, created_at, updated_at";

/// Fields collected at registration
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: Option<&'a str>,
    pub department: Option<&'a str>,
    pub graduation_year: Option<i32>,
    pub google_id: Option<&'a str>,
    pub is_verified: bool,
    pub verification_token: Option<&'a str>,
}

/// Optional fields for profile updates
#[derive(Debug, Default)]
pub struct UpdateProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile_picture_url: Option<String>,
}

pub async fn insert(pool: &PgPool, new_user: &NewUser<'_>) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, username, first_name, last_name, password_hash,
                           department, graduation_year, google_id, is_verified,
                           verification_token)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(new_user.email)
    .bind(new_user.username)
    .bind(new_user.first_name)
    .bind(new_user.last_name)
    .bind(new_user.password_hash)
    .bind(new_user.department)
    .bind(new_user.graduation_year)
    .bind(new_user.google_id)
    .bind(new_user.is_verified)
    .bind(new_user.verification_token)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => IdentityError::EmailAlreadyExists,
        _ => e.into(),
    })?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Attach a Google subject id to an existing account
pub async fn set_google_id(pool: &PgPool, id: Uuid, google_id: &str) -> Result<()> {
    sqlx::query("UPDATE users SET google_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(google_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Consume a verification token; returns the verified user if the token matched
pub async fn verify_email(pool: &PgPool, token: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET is_verified = TRUE, verification_token = NULL, updated_at = NOW()
        WHERE verification_token = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn set_reset_token(
    pool: &PgPool,
    id: Uuid,
    token: &str,
    expires: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET reset_password_token = $2, reset_password_expires = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(token)
    .bind(expires)
    .execute(pool)
    .await?;
    Ok(())
}

/// Consume an unexpired reset token and install the new password hash
pub async fn reset_password(pool: &PgPool, token: &str, password_hash: &str) -> Result<bool> {
    let affected = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $2,
            reset_password_token = NULL,
            reset_password_expires = NULL,
            updated_at = NOW()
        WHERE reset_password_token = $1 AND reset_password_expires > NOW()
        "#,
    )
    .bind(token)
    .bind(password_hash)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    fields: &UpdateProfileFields,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            department = COALESCE($4, department),
            graduation_year = COALESCE($5, graduation_year),
            profile_picture_url = COALESCE($6, profile_picture_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(fields.first_name.as_deref())
    .bind(fields.last_name.as_deref())
    .bind(fields.department.as_deref())
    .bind(fields.graduation_year)
    .bind(fields.profile_picture_url.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or(IdentityError::UserNotFound)?;

    Ok(user)
}
