//! Configuration for identity-service
//!
//! Everything comes from environment variables; a `.env` file is loaded in
//! debug builds. SMTP and Google OAuth settings are optional — without them
//! the matching features degrade (emails are logged, Google sign-in is
//! rejected with a configuration error).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
    pub oauth: OAuthSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            server: ServerSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            email: EmailSettings::from_env()?,
            oauth: OAuthSettings::from_env(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8081".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub frontend_base_url: String,
}

impl EmailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@linkup.dev".to_string()),
            frontend_base_url: env::var("FRONTEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    pub google_userinfo_url: String,
}

impl OAuthSettings {
    fn from_env() -> Self {
        Self {
            google_userinfo_url: env::var("OAUTH_GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/userinfo".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_settings_defaults() {
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");

        let settings = ServerSettings::from_env().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8081);
    }

    #[test]
    fn test_database_settings_from_env() {
        env::set_var("DATABASE_URL", "postgres://localhost/linkup");
        env::set_var("DATABASE_MAX_CONNECTIONS", "40");

        let settings = DatabaseSettings::from_env().unwrap();
        assert_eq!(settings.url, "postgres://localhost/linkup");
        assert_eq!(settings.max_connections, 40);

        env::remove_var("DATABASE_URL");
        env::remove_var("DATABASE_MAX_CONNECTIONS");
    }
}
