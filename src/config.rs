use std::{env, net::SocketAddr};

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub production: bool,
    pub bind_addr: SocketAddr,
    pub frontend_origin: String,
    pub seed_demo_users: bool,
    pub auth_rate_limit_seconds: u64,
    pub auth_rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = lookup("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let frontend_origin =
            lookup("FRONTEND_ORIGIN").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());

        // Demo accounts carry a published password; only seed them on request.
        let seed_demo_users = match lookup("SEED_DEMO_USERS") {
            Some(v) => parse_flag("SEED_DEMO_USERS", &v)?,
            None => false,
        };

        let auth_rate_limit_seconds = lookup("RATE_LIMITER_AUTH_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1);
        let auth_rate_limit_burst = lookup("RATE_LIMITER_AUTH_BURST")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        Ok(Config {
            production,
            bind_addr,
            frontend_origin,
            seed_demo_users,
            auth_rate_limit_seconds,
            auth_rate_limit_burst,
        })
    }

    /// Session cookies carry `Secure` only in production-like deployments.
    pub fn secure_cookies(&self) -> bool {
        self.production
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
