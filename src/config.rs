use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub database_reset: bool,
    pub session_ttl_secs: i64,
    pub secure_cookies: bool,
    pub admin_token: Option<String>,
    pub seed_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database_max_connections: 5,
            database_reset: false,
            session_ttl_secs: 24 * 60 * 60,
            secure_cookies: false,
            admin_token: None,
            seed_categories: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: try_load("PORT", defaults.port)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: try_load(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            database_reset: try_load("DATABASE_RESET", defaults.database_reset)?,
            session_ttl_secs: try_load("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            secure_cookies: try_load("SECURE_COOKIES", defaults.secure_cookies)?,
            admin_token: var("ADMIN_TOKEN"),
            seed_categories: var("SEED_CATEGORIES")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
