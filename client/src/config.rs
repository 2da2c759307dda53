//! Client configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Where the client connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: "8080".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `SERVER_HOST` and `SERVER_PORT`.
    ///
    /// Unset variables fall back to `localhost:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env::var("SERVER_PORT").unwrap_or(defaults.port),
        }
    }

    /// WebSocket URL of the server's root endpoint.
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}:{}/", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url(), "ws://localhost:8080/");
    }
}
