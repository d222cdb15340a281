use std::{env, path::PathBuf};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Plaintext admin password, hashed with argon2 when the state is built.
    pub admin_password: String,
    /// HMAC key for admin and table session tokens.
    pub session_secret: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Database location alone, for tools that never serve requests.
    pub fn database_url_from_env() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://restaurant.db?mode=rwc".to_string())
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = Self::database_url_from_env();
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
        let session_secret = env::var("SESSION_SECRET").context("SESSION_SECRET is not set")?;
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(16 * 1024 * 1024);
        Ok(Self {
            database_url,
            host,
            port,
            admin_password,
            session_secret,
            upload_dir,
            max_upload_bytes,
        })
    }
}
