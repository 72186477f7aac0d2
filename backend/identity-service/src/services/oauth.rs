/// Google sign-in support
///
/// The client obtains an access token from Google and posts it here; we
/// exchange it for the user's profile at the userinfo endpoint. Only
/// verified Google emails are accepted.
use crate::config::OAuthSettings;
use crate::error::{IdentityError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Google's stable subject identifier
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
}

#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    pub fn new(config: &OAuthSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            userinfo_url: config.google_userinfo_url.clone(),
        }
    }

    /// Resolve an access token to a verified Google identity
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::OAuth(format!("Failed to reach Google: {e}")))?;

        if !response.status().is_success() {
            return Err(IdentityError::OAuth(format!(
                "Google rejected the token (status {})",
                response.status()
            )));
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| IdentityError::OAuth(format!("Unexpected userinfo payload: {e}")))?;

        if info.email.is_empty() || !info.email_verified {
            return Err(IdentityError::OAuth(
                "Email not verified with Google".to_string(),
            ));
        }

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_userinfo_deserialization() {
        let json = r#"{
            "sub": "1234567890",
            "email": "alum@example.com",
            "email_verified": true,
            "given_name": "Alma",
            "family_name": "Mater"
        }"#;

        let info: GoogleUserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sub, "1234567890");
        assert!(info.email_verified);
        assert_eq!(info.given_name, "Alma");
    }

    #[test]
    fn test_userinfo_defaults_unverified() {
        let json = r#"{"sub": "1", "email": "x@example.com"}"#;
        let info: GoogleUserInfo = serde_json::from_str(json).unwrap();
        assert!(!info.email_verified);
    }
}
