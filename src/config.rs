// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Directory where uploaded media files are stored and served from.
    pub media_dir: String,
    pub logs_dir: String,
    /// Max contact messages accepted per client IP per UTC day.
    pub contact_daily_limit: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let media_dir = env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string());

        let logs_dir = env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string());

        let contact_daily_limit = env::var("CONTACT_DAILY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let admin_username = env::var("ADMIN_USERNAME").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            media_dir,
            logs_dir,
            contact_daily_limit,
            admin_username,
            admin_password,
        }
    }
}
