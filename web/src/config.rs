//! Configuration management for the booking server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a local `.env` file.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum concurrent WebSocket sessions
    pub max_connections: usize,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            max_connections: 1000,
            shutdown_timeout: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable           | Default   |
    /// |--------------------|-----------|
    /// | `HOST`             | `0.0.0.0` |
    /// | `PORT`             | `8080`    |
    /// | `RUST_LOG`         | `info`    |
    /// | `MAX_CONNECTIONS`  | `1000`    |
    /// | `SHUTDOWN_TIMEOUT` | `30`      |
    ///
    /// Unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.host),
                port: parse_or("PORT", defaults.port),
                log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
                max_connections: parse_or("MAX_CONNECTIONS", defaults.max_connections),
                shutdown_timeout: parse_or("SHUTDOWN_TIMEOUT", defaults.shutdown_timeout),
            },
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.max_connections, 1000);
        assert_eq!(config.server.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_or_falls_back_when_unset() {
        assert_eq!(parse_or("CINEMA_BOOKING_TEST_UNSET_VARIABLE", 42_u16), 42);
    }
}
