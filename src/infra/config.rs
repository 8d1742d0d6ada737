//! Centralized configuration (environment variables + defaults).

use crate::domain::ErrorShape;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "bird_api=info,tower_http=info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    /// How 422 bodies render validation errors, fixed for the whole process.
    pub error_shape: ErrorShape,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL");

        let max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    reason: e.to_string(),
                })?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let error_shape = match non_empty("ERROR_FORMAT") {
            Some(v) => v
                .parse::<ErrorShape>()
                .map_err(|reason| ConfigError::Invalid {
                    var: "ERROR_FORMAT",
                    reason,
                })?,
            None => ErrorShape::default(),
        };

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            error_shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_select_memory_store() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.error_shape, ErrorShape::Messages);
    }

    #[test]
    fn reads_all_variables() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/birds"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("ERROR_FORMAT", "full_messages"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/birds"));
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.error_shape, ErrorShape::FullMessages);
    }

    #[test]
    fn blank_database_url_is_unset() {
        let config = from_pairs(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = from_pairs(&[("ERROR_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ERROR_FORMAT", .. }));

        let err = from_pairs(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = from_pairs(&[("DATABASE_MAX_CONNECTIONS", "-3")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { var: "DATABASE_MAX_CONNECTIONS", .. }
        ));
    }
}
