use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use password_hash::rand_core::OsRng;

use crate::{config::AppConfig, db::OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    /// PHC string of the configured admin password.
    pub admin_password_hash: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> anyhow::Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let admin_password_hash = Argon2::default()
            .hash_password(config.admin_password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();

        Ok(Self {
            orm,
            config: Arc::new(config),
            admin_password_hash: admin_password_hash.into(),
        })
    }

    pub fn sqlite_pool(&self) -> &sqlx::SqlitePool {
        self.orm.get_sqlite_connection_pool()
    }
}
