use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::services::DEFAULT_HISTORY_CAPACITY;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// History is kept in memory only when unset.
    pub redis_url: Option<String>,
    /// JSON exchange table; the built-in table is used when unset.
    pub exchanges_file: Option<PathBuf>,
    pub default_exchange: String,
    pub history_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            redis_url: None,
            exchanges_file: None,
            default_exchange: "binance".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            None => defaults.port,
        };

        let history_capacity = match var("HISTORY_CAPACITY") {
            Some(capacity) => capacity
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid HISTORY_CAPACITY: {}", capacity))?,
            None => defaults.history_capacity,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            redis_url: var("REDIS_URL"),
            exchanges_file: var("EXCHANGES_FILE").map(PathBuf::from),
            default_exchange: var("DEFAULT_EXCHANGE").unwrap_or(defaults.default_exchange),
            history_capacity,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.redis_url.is_none());
        assert_eq!(config.default_exchange, "binance");
        assert_eq!(config.history_capacity, 500);
    }

    #[test]
    fn test_reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("EXCHANGES_FILE", "exchanges.json"),
            ("HISTORY_CAPACITY", "50"),
            ("DEFAULT_EXCHANGE", ""),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.exchanges_file, Some(PathBuf::from("exchanges.json")));
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.default_exchange, "binance");
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(AppConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
    }
}
