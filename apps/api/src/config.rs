//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};

use m4_core::DEFAULT_STORE_NAME;

/// Secret used when `JWT_SECRET` is unset. Only fit for development.
pub const DEV_JWT_SECRET: &str = "m4-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind (default: 0.0.0.0)
    pub bind_addr: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Header line of rendered quotes
    pub store_name: String,

    /// Allow cross-origin requests from any origin
    pub cors_allow_any: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            bind_addr: var("M4_BIND_ADDR", "0.0.0.0")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("M4_BIND_ADDR".to_string()))?,

            port: var("PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            db_path: var("M4_DB_PATH", "m4.db"),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            jwt_secret: var("JWT_SECRET", DEV_JWT_SECRET),

            jwt_access_lifetime_secs: var("JWT_ACCESS_LIFETIME_SECS", "86400") // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            store_name: var("M4_STORE_NAME", DEFAULT_STORE_NAME),

            cors_allow_any: var("CORS_ALLOW_ANY", "true")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CORS_ALLOW_ANY".to_string()))?,
        };

        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        if config.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()));
        }

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// True when tokens are signed with [`DEV_JWT_SECRET`].
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::load_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.db_path, "m4.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_access_lifetime_secs, 86400);
        assert_eq!(config.store_name, "M4 Tática");
        assert!(config.cors_allow_any);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("M4_BIND_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
            ("JWT_SECRET", "prod-secret"),
            ("M4_STORE_NAME", "Loja Centro"),
            ("CORS_ALLOW_ANY", "false"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.store_name, "Loja Centro");
        assert!(!config.cors_allow_any);
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue(key)) if key == "PORT"
        ));
        assert!(matches!(
            load(&[("JWT_ACCESS_LIFETIME_SECS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CORS_ALLOW_ANY", "sometimes")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("JWT_SECRET", "  ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
