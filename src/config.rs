// src/config.rs

use std::{env, fmt::Display, str::FromStr};

use dotenvy::dotenv;
use tracing::info;

use crate::errors::{AppError, Result};

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub otp_ttl_secs: i64,
    pub otp_hash_cost: u32,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_var("SERVER_PORT", 5001)?,
            database_url: required_var("DATABASE_URL")?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            jwt_secret: required_var("JWT_SECRET")?,
            jwt_expiry_days: parse_var("JWT_EXPIRY_DAYS", 7)?,
            otp_ttl_secs: parse_var("OTP_TTL_SECS", 300)?,
            otp_hash_cost: parse_var("OTP_HASH_COST", 10)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
        };

        if !(4..=31).contains(&config.otp_hash_cost) {
            return Err(AppError::Config(format!(
                "OTP_HASH_COST must be between 4 and 31, got {}",
                config.otp_hash_cost
            )));
        }

        info!(
            host = %config.server_host,
            port = config.server_port,
            "Application configuration loaded"
        );
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn required_var(key: &str) -> Result<String> {
    env::var(key).map_err(|e| AppError::Config(format!("Missing environment variable '{key}': {e}")))
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
