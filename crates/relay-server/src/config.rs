//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:6969";

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:textgpt.db?mode=rwc";

/// Relay server configuration.
///
/// Provider and gateway credentials are loaded by their own crates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RELAY_ADDR` | Server bind address | `0.0.0.0:6969` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:textgpt.db?mode=rwc` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr = env::var("RELAY_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Ok(Self { addr, database_url })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RELAY_ADDR format: {0}")]
    InvalidAddr(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so every case lives in one test.
    #[test]
    fn test_from_env() {
        env::remove_var("RELAY_ADDR");
        env::remove_var("SQLITE_PATH");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);

        env::set_var("RELAY_ADDR", "127.0.0.1:8080");
        env::set_var("SQLITE_PATH", "sqlite::memory:");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.database_url, "sqlite::memory:");

        env::set_var("RELAY_ADDR", "not an address");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Invalid RELAY_ADDR format: not an address");

        env::remove_var("RELAY_ADDR");
        env::remove_var("SQLITE_PATH");
    }
}
