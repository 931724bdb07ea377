//! Configuration module for the fleet backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default administrator login, kept for compatibility with existing dashboards.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one JSON array file per resource type
    pub data_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Administrator username accepted by the login endpoint
    pub admin_username: String,
    /// Administrator password accepted by the login endpoint
    pub admin_password: String,
    /// Optional pre-shared key accepted through the `x-api-key` header
    pub api_psk: Option<String>,
    /// Whether resource routes require a session token or the PSK
    pub require_auth: bool,
    /// Lifetime of an issued session token, in minutes
    pub session_ttl_minutes: i64,
    /// Skip the duplicate-id check on append (legacy data files)
    pub allow_duplicate_ids: bool,
}

/// A configuration value that could not be parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.variable, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("FLEET_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let bind_addr = parse_var("FLEET_BIND_ADDR", "127.0.0.1:8080")?;

        let log_level = env::var("FLEET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_username = env::var("FLEET_ADMIN_USERNAME")
            .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string());
        let admin_password = env::var("FLEET_ADMIN_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        let api_psk = env::var("FLEET_API_PSK").ok().filter(|k| !k.is_empty());

        Ok(Self {
            data_dir,
            bind_addr,
            log_level,
            admin_username,
            admin_password,
            api_psk,
            require_auth: parse_var("FLEET_REQUIRE_AUTH", "false")?,
            session_ttl_minutes: parse_ttl_minutes()?,
            allow_duplicate_ids: parse_var("FLEET_ALLOW_DUPLICATE_IDS", "false")?,
        })
    }

    /// Session lifetime as a duration.
    pub fn session_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.session_ttl_minutes).ok_or_else(|| ConfigError {
            variable: "FLEET_SESSION_TTL_MINUTES",
            value: self.session_ttl_minutes.to_string(),
        })
    }

    /// True when the administrator password was never changed from the default.
    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

fn parse_var<T: std::str::FromStr>(
    variable: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = env::var(variable).unwrap_or_else(|_| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError { variable, value })
}

fn parse_ttl_minutes() -> Result<i64, ConfigError> {
    let variable = "FLEET_SESSION_TTL_MINUTES";
    let minutes: i64 = parse_var(variable, "480")?;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        return Err(ConfigError {
            variable,
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}
