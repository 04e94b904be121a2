//! Relay configuration, loaded from environment variables.
//!
//! The store credentials are required: without them the process refuses
//! to start. The service key is redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default WebSocket bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

/// Default per-request timeout for store calls, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Relay server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Base URL of the external store's REST endpoint.
    pub store_url: String,

    /// Service key used to authenticate store requests.
    pub store_service_key: String,

    /// Per-request timeout for store calls.
    pub store_timeout: Duration,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("store_url", &self.store_url)
            .field("store_service_key", &"[REDACTED]")
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid STORE_TIMEOUT_SECS: {0}")]
    InvalidStoreTimeout(String),
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Loads configuration from a map (used by tests).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_addr = vars
            .get("SCRAWL_BIND_ADDR")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let store_url = vars
            .get("STORE_URL")
            .cloned()
            .ok_or(ConfigError::MissingVar("STORE_URL"))?;

        let store_service_key = vars
            .get("STORE_SERVICE_KEY")
            .cloned()
            .ok_or(ConfigError::MissingVar("STORE_SERVICE_KEY"))?;

        let store_timeout = match vars.get("STORE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    ConfigError::InvalidStoreTimeout(format!(
                        "must be a positive integer, got '{raw}': {e}"
                    ))
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidStoreTimeout(
                        "must be greater than 0".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_addr,
            store_url,
            store_service_key,
            store_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            ("STORE_URL".to_string(), "https://store.example.com".to_string()),
            ("STORE_SERVICE_KEY".to_string(), "sk-test".to_string()),
        ])
    }

    #[test]
    fn test_from_vars_with_defaults() {
        let config = ServerConfig::from_vars(&base_vars()).expect("should load");

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.store_url, "https://store.example.com");
        assert_eq!(config.store_service_key, "sk-test");
        assert_eq!(
            config.store_timeout,
            Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_from_vars_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("SCRAWL_BIND_ADDR".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("STORE_TIMEOUT_SECS".to_string(), "3".to_string());

        let config = ServerConfig::from_vars(&vars).expect("should load");

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.store_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_store_url_fails() {
        let mut vars = base_vars();
        vars.remove("STORE_URL");

        let result = ServerConfig::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingVar("STORE_URL"))));
    }

    #[test]
    fn test_missing_service_key_fails() {
        let mut vars = base_vars();
        vars.remove("STORE_SERVICE_KEY");

        let result = ServerConfig::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar("STORE_SERVICE_KEY"))
        ));
    }

    #[test]
    fn test_store_timeout_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("STORE_TIMEOUT_SECS".to_string(), "0".to_string());

        let result = ServerConfig::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidStoreTimeout(msg)) if msg.contains("greater than 0")
        ));
    }

    #[test]
    fn test_store_timeout_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("STORE_TIMEOUT_SECS".to_string(), "ten".to_string());

        let result = ServerConfig::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidStoreTimeout(msg)) if msg.contains("positive integer")
        ));
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let config = ServerConfig::from_vars(&base_vars()).expect("should load");
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk-test"));
    }
}
