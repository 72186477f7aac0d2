use crate::db::users::{self, NewUser};
use crate::error::{IdentityError, Result};
use crate::models::PublicUser;
use crate::routes::AppState;
use crate::security::password;
use crate::validators;
use actix_web::{get, post, web, HttpResponse};
use auth_core::{jwt, AuthUser};
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

const VERIFICATION_TOKEN_LEN: usize = 48;
const RESET_TOKEN_EXPIRY_HOURS: i64 = 1;

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
    pub graduation_year: i32,
    pub department: String,
}

/// POST /auth/register
///
/// Accounts are active immediately; verification only flips `is_verified`
/// once the emailed token comes back.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    if body.password != body.confirm_password {
        return Err(IdentityError::Validation(
            "Password fields didn't match".to_string(),
        ));
    }
    validators::validate_department(&body.department)?;
    validators::validate_graduation_year(body.graduation_year)?;

    let password_hash = password::hash_password(&body.password)?;
    let verification_token = random_token(VERIFICATION_TOKEN_LEN);
    let username = body.username.clone().unwrap_or_else(|| body.email.clone());

    let user = users::insert(
        &state.db,
        &NewUser {
            email: &body.email,
            username: &username,
            first_name: &body.first_name,
            last_name: &body.last_name,
            password_hash: Some(&password_hash),
            department: Some(&body.department),
            graduation_year: Some(body.graduation_year),
            google_id: None,
            is_verified: false,
            verification_token: Some(&verification_token),
        },
    )
    .await?;

    // Best-effort: a failed email must not roll back the registration
    if let Err(e) = state
        .email
        .send_verification_email(&user.email, &verification_token)
        .await
    {
        warn!(user_id = %user.id, "Failed to send verification email: {e}");
    }

    let tokens = jwt::generate_token_pair(user.id, &user.email)?;
    Ok(HttpResponse::Created().json(json!({
        "user": PublicUser::from(user),
        "access": tokens.access,
        "refresh": tokens.refresh,
        "message": "Registration successful",
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(IdentityError::Validation(
            "Please provide both email and password".to_string(),
        ));
    }

    let user = users::find_by_email(&state.db, &body.email)
        .await?
        .ok_or(IdentityError::InvalidCredentials)?;

    let hash = user
        .password_hash
        .as_deref()
        .ok_or(IdentityError::InvalidCredentials)?;
    if !password::verify_password(&body.password, hash)? {
        return Err(IdentityError::InvalidCredentials);
    }

    let tokens = jwt::generate_token_pair(user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(json!({
        "user": PublicUser::from(user),
        "access": tokens.access,
        "refresh": tokens.refresh,
    })))
}

/// GET /auth/me
#[get("/auth/me")]
pub async fn me(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let user = users::find_by_id(&state.db, auth.id)
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct GoogleRegisterData {
    pub graduation_year: i32,
    pub department: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub token: String,
    pub register_data: Option<GoogleRegisterData>,
}

/// POST /auth/google
///
/// Links the Google subject to an existing account by email, or creates one
/// when `register_data` is supplied. Google-created accounts are born
/// verified.
#[post("/auth/google")]
pub async fn google_auth(
    state: web::Data<AppState>,
    body: web::Json<GoogleAuthRequest>,
) -> Result<HttpResponse> {
    let info = state.oauth.fetch_user_info(&body.token).await?;

    let user = match users::find_by_email(&state.db, &info.email).await? {
        Some(user) => {
            if user.google_id.is_none() {
                users::set_google_id(&state.db, user.id, &info.sub).await?;
            }
            user
        }
        None => {
            let Some(register_data) = &body.register_data else {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "error": "User does not exist",
                    "requires_registration": true,
                    "email": info.email,
                })));
            };
            validators::validate_department(&register_data.department)?;
            validators::validate_graduation_year(register_data.graduation_year)?;

            users::insert(
                &state.db,
                &NewUser {
                    email: &info.email,
                    username: &info.email,
                    first_name: &info.given_name,
                    last_name: &info.family_name,
                    password_hash: None,
                    department: Some(&register_data.department),
                    graduation_year: Some(register_data.graduation_year),
                    google_id: Some(&info.sub),
                    is_verified: true,
                    verification_token: None,
                },
            )
            .await?
        }
    };

    let tokens = jwt::generate_token_pair(user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(json!({
        "user": PublicUser::from(user),
        "access": tokens.access,
        "refresh": tokens.refresh,
        "message": "Successfully authenticated with Google",
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// GET /auth/verify-email?token=..
#[get("/auth/verify-email")]
pub async fn verify_email(
    state: web::Data<AppState>,
    query: web::Query<VerifyEmailQuery>,
) -> Result<HttpResponse> {
    let user = users::verify_email(&state.db, &query.token)
        .await?
        .ok_or(IdentityError::InvalidToken)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Email verified successfully",
        "user": PublicUser::from(user),
    })))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /auth/forgot-password
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse> {
    let user = users::find_by_email(&state.db, &body.email)
        .await?
        .ok_or_else(|| IdentityError::Validation("No user found with this email".to_string()))?;

    let token = Uuid::new_v4().to_string();
    let expires = Utc::now() + Duration::hours(RESET_TOKEN_EXPIRY_HOURS);
    users::set_reset_token(&state.db, user.id, &token, expires).await?;

    state
        .email
        .send_password_reset_email(&user.email, &token)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password reset instructions sent to your email",
    })))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /auth/reset-password
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    let hash = password::hash_password(&body.password)?;

    if !users::reset_password(&state.db, &body.token, &hash).await? {
        return Err(IdentityError::Validation(
            "Invalid or expired reset token".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Password reset successful" })))
}
