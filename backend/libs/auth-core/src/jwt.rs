//! JWT issue and validation shared by every LinkUp service
//!
//! Tokens are HS256 signed with a single shared secret loaded once at
//! startup. Services that only validate call [`initialize`] the same way as
//! identity-service; the keys are immutable after that.

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every LinkUp token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// "access" or "refresh"
    pub token_type: String,
    /// Email address at issue time
    pub email: String,
}

/// Access + refresh token pair returned by auth endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub token_type: String,
    pub expires_in: i64,
}

static ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Install the shared secret. Must run during startup before any token
/// operation; a second call returns an error.
pub fn initialize(secret: &str) -> Result<()> {
    if secret.len() < 32 {
        return Err(anyhow!("JWT secret must be at least 32 bytes"));
    }

    ENCODING_KEY
        .set(EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;
    DECODING_KEY
        .set(DecodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn encoding_key() -> Result<&'static EncodingKey> {
    ENCODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT keys not initialized; call jwt::initialize() at startup"))
}

fn decoding_key() -> Result<&'static DecodingKey> {
    DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT keys not initialized; call jwt::initialize() at startup"))
}

fn generate(user_id: Uuid, email: &str, token_type: &str, lifetime: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        token_type: token_type.to_string(),
        email: email.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key()?)
        .map_err(|e| anyhow!("Failed to generate {token_type} token: {e}"))
}

/// Short-lived token for API authentication
pub fn generate_access_token(user_id: Uuid, email: &str) -> Result<String> {
    generate(
        user_id,
        email,
        "access",
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Long-lived token used only to obtain new access tokens
pub fn generate_refresh_token(user_id: Uuid, email: &str) -> Result<String> {
    generate(
        user_id,
        email,
        "refresh",
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )
}

/// Convenience: both tokens in one call
pub fn generate_token_pair(user_id: Uuid, email: &str) -> Result<TokenPair> {
    Ok(TokenPair {
        access: generate_access_token(user_id, email)?,
        refresh: generate_refresh_token(user_id, email)?,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

/// Validate signature and expiry, returning the decoded claims
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key()?, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate an access token and extract the subject user id. Refresh tokens
/// are only good for minting new access tokens and never authenticate a
/// request themselves.
pub fn user_id_from_token(token: &str) -> Result<Uuid> {
    let data = validate_token(token)?;
    if data.claims.token_type != "access" {
        return Err(anyhow!("Not an access token"));
    }
    Uuid::parse_str(&data.claims.sub).map_err(|e| anyhow!("Invalid user id in token: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

    fn init_test_keys() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            initialize(TEST_SECRET).expect("Failed to initialize test keys");
        });
    }

    #[test]
    fn test_generate_access_token() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com").unwrap();
        assert_eq!(token.matches('.').count(), 2); // JWT has 3 parts
    }

    #[test]
    fn test_validate_valid_token() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com").unwrap();

        let data = validate_token(&token).unwrap();
        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.email, "test@example.com");
        assert_eq!(data.claims.token_type, "access");
    }

    #[test]
    fn test_validate_garbage_token() {
        init_test_keys();
        assert!(validate_token("not.a.token").is_err());
    }

    #[test]
    fn test_validate_tampered_token() {
        init_test_keys();

        let token = generate_access_token(Uuid::new_v4(), "test@example.com").unwrap();
        let tampered = token.replace('a', "b");
        assert!(validate_token(&tampered).is_err());
    }

    #[test]
    fn test_user_id_round_trip() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com").unwrap();
        assert_eq!(user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_outlives_access() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(user_id, "test@example.com").unwrap();

        let access = validate_token(&pair.access).unwrap().claims;
        let refresh = validate_token(&pair.refresh).unwrap().claims;
        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.token_type, "refresh");
    }

    #[test]
    fn test_refresh_token_never_authenticates() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(user_id, "test@example.com").unwrap();

        assert!(user_id_from_token(&pair.refresh).is_err());
        assert_eq!(user_id_from_token(&pair.access).unwrap(), user_id);
    }

    #[test]
    fn test_reject_short_secret() {
        assert!(initialize("short").is_err());
    }
}
