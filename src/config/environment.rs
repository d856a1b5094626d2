//! Environment configuration
//!
//! Read once at startup from the process environment (after `.env` has been
//! loaded). Every variable has a default so the service starts with no setup.

use std::env;

use thiserror::Error;
use tracing::Level;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_level: Level,
    /// Postgres URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            log_level: Level::INFO,
            database_url: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "port number",
                value: raw,
            })?,
            None => defaults.port,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(raw) => raw.parse::<Level>().map_err(|_| ConfigError::Invalid {
                name: "LOG_LEVEL",
                expected: "log level",
                value: raw,
            })?,
            None => defaults.log_level,
        };

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: var("HOST").unwrap_or(defaults.host),
            port,
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_level,
            database_url: var("DATABASE_URL"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// `host:port` to bind
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
