//! Configuration management for the storefront service.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::TransitionPolicy;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub actors: ActorConfig,
    pub orders: OrderConfig,
    pub seed: SeedConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Default log level when `RUST_LOG` is not set
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// Channel capacity of every resource actor
    pub buffer_size: usize,
}

#[derive(Debug, Clone)]
pub struct OrderConfig {
    pub transition_policy: TransitionPolicy,
}

/// Demo data loaded at startup.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_name: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed browser origins
    pub origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let strict: bool = parse(&lookup, "STOREFRONT_STRICT_ORDER_TRANSITIONS", false)?;
        let origins = string("STOREFRONT_CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            server: ServerConfig {
                host: string("STOREFRONT_HOST", "127.0.0.1"),
                port: parse(&lookup, "STOREFRONT_PORT", 5000)?,
                log_level: string("STOREFRONT_LOG_LEVEL", "info"),
            },
            actors: ActorConfig {
                buffer_size: parse(&lookup, "STOREFRONT_ACTOR_BUFFER", 100)?,
            },
            orders: OrderConfig {
                transition_policy: if strict {
                    TransitionPolicy::Strict
                } else {
                    TransitionPolicy::Permissive
                },
            },
            seed: SeedConfig {
                enabled: parse(&lookup, "STOREFRONT_SEED", false)?,
                admin_email: string("STOREFRONT_ADMIN_EMAIL", "admin@storefront.local"),
                admin_name: string("STOREFRONT_ADMIN_NAME", "Admin"),
            },
            cors: CorsConfig { origins },
        })
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
