//! Configuration management
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use thiserror::Error;

use crate::auth::SharedSecret;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Current environment
    pub environment: Environment,

    /// Interface to bind
    pub bind_address: IpAddr,

    /// Server port
    pub port: u16,

    /// Secret for signing and verifying auth tokens
    pub jwt_secret: SharedSecret,

    /// Bech32 prefix of accepted wallet addresses
    pub address_prefix: String,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ADDRESS_PREFIX: &str = "celestia";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|s| s.parse::<Environment>())
            .unwrap_or(Ok(Environment::Development))?;

        let bind_address = match lookup("BIND_ADDRESS") {
            Some(s) => s.parse::<IpAddr>().map_err(|_| {
                ConfigError::InvalidValue(format!("BIND_ADDRESS is not an IP address: '{}'", s))
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match lookup("PORT") {
            Some(s) => s
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(format!("PORT must be a valid number: '{}'", s)))?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("JWT_SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET_KEY".to_string()))?;
        let jwt_secret = SharedSecret::new(jwt_secret)
            .map_err(|_| ConfigError::InvalidValue("JWT_SECRET_KEY must not be empty".to_string()))?;

        let address_prefix =
            lookup("ADDRESS_PREFIX").unwrap_or_else(|| DEFAULT_ADDRESS_PREFIX.to_string());
        validate_address_prefix(&address_prefix)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").filter(|s| !s.is_empty());

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            environment,
            bind_address,
            port,
            jwt_secret,
            address_prefix,
            cors_allowed_origins,
            log_level,
        })
    }
}

/// Bech32 human-readable parts are lowercase printable ASCII
fn validate_address_prefix(prefix: &str) -> Result<(), ConfigError> {
    let valid = !prefix.is_empty()
        && prefix.len() <= 83
        && prefix
            .bytes()
            .all(|b| (33..=126).contains(&b) && !b.is_ascii_uppercase());

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "ADDRESS_PREFIX is not a valid bech32 prefix: '{}'",
            prefix
        )))
    }
}
