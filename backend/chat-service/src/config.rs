//! Configuration for chat-service

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub media: MediaSettings,
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
            media: MediaSettings::from_env(),
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
                .unwrap_or_else(|_| "8083".to_string())
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

/// Uploaded files land in `root`; `public_base` is the URL prefix clients
/// use to reach them.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub root: String,
    pub public_base: String,
}

impl MediaSettings {
    fn from_env() -> Self {
        Self {
            root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()),
            public_base: env::var("MEDIA_PUBLIC_BASE").unwrap_or_else(|_| "/media".to_string()),
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
        assert_eq!(settings.port, 8083);
    }

    #[test]
    fn test_media_settings_defaults() {
        env::remove_var("MEDIA_ROOT");
        env::remove_var("MEDIA_PUBLIC_BASE");

        let settings = MediaSettings::from_env();
        assert_eq!(settings.root, "./media");
        assert_eq!(settings.public_base, "/media");
    }
}
