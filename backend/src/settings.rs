//! Service configuration loaded via OrthoConfig.
//!
//! Every value can be supplied as a `--kebab-case` flag, a configuration file
//! key, or a `PRODUCT_SERVICE_*` environment variable.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("database_url is required (set PRODUCT_SERVICE_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// The bind address is not a socket address.
    #[error("invalid bind_addr '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Runtime configuration for the product service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PRODUCT_SERVICE")]
pub struct ProductServiceSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Idle connections the pool keeps warm.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connection_timeout_secs: Option<u64>,
    /// Apply pending migrations at startup; defaults to `true`.
    pub run_migrations: Option<bool>,
    /// Redis connection string; the in-process cache is used when absent.
    pub redis_url: Option<String>,
    /// Lifetime of cached product entries in seconds.
    pub cache_ttl_secs: Option<u64>,
}

impl ProductServiceSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Return the database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no non-blank URL
    /// was supplied.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Build the connection pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no database URL
    /// was supplied.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let timeout = self
            .db_connection_timeout_secs
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS);
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .with_min_idle(Some(self.db_min_idle.unwrap_or(DEFAULT_MIN_IDLE)))
            .with_connection_timeout(Duration::from_secs(timeout)))
    }

    /// Whether pending migrations run at startup.
    pub const fn run_migrations(&self) -> bool {
        !matches!(self.run_migrations, Some(false))
    }

    /// Redis connection string, ignoring blank values.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Lifetime of cached product entries.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }
}
