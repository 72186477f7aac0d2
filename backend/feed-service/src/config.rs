//! Configuration for feed-service

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub jwt: JwtSettings,
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
                .unwrap_or_else(|_| "8082".to_string())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_settings_defaults() {
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");

        let settings = ServerSettings::from_env().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8082);
    }
}
