use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::domain::ExchangeProfile;

/// Read-only table of exchange fee schedules keyed by exchange id.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRegistry {
    profiles: HashMap<String, ExchangeProfile>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exchange(&mut self, key: &str, profile: ExchangeProfile) {
        self.profiles.insert(key.to_string(), profile);
    }

    /// Configure with the built-in fee table
    pub fn with_defaults(mut self) -> Self {
        self.add_exchange(
            "binance",
            ExchangeProfile::new("Binance Futures", 0.02, 0.05, 8.0, 0.03),
        );
        self.add_exchange("bybit", ExchangeProfile::new("Bybit", 0.02, 0.055, 8.0, 0.03));
        self.add_exchange("okx", ExchangeProfile::new("OKX", 0.02, 0.05, 8.0, 0.03));
        self.add_exchange("bitget", ExchangeProfile::new("Bitget", 0.02, 0.06, 8.0, 0.03));
        self.add_exchange(
            "hyperliquid",
            ExchangeProfile::new("Hyperliquid", 0.015, 0.045, 1.0, 0.03),
        );
        self
    }

    /// Parse a JSON object of `{ key: { label, maker_pct, taker_pct,
    /// funding_interval_hours, interest_daily_pct } }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: HashMap<String, ExchangeProfile> =
            serde_json::from_str(json).context("Failed to parse exchange table")?;

        let profiles = profiles
            .into_iter()
            .map(|(key, mut profile)| {
                if profile.label.is_empty() {
                    profile.label = key.clone();
                }
                (key, profile)
            })
            .collect();

        Ok(Self { profiles })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read exchange table {}", path.display()))?;
        let registry = Self::from_json(&json)?;

        info!(
            "Loaded {} exchange profiles from {}",
            registry.len(),
            path.display()
        );

        Ok(registry)
    }

    pub fn resolve(&self, key: &str) -> Option<&ExchangeProfile> {
        self.profiles.get(key)
    }

    /// Profile for `key`, or the zero-fee custom profile when unknown.
    pub fn resolve_or_custom(&self, key: &str) -> ExchangeProfile {
        self.resolve(key).cloned().unwrap_or_else(ExchangeProfile::custom)
    }

    /// All profiles sorted by key
    pub fn list(&self) -> Vec<(String, ExchangeProfile)> {
        let mut entries: Vec<(String, ExchangeProfile)> = self
            .profiles
            .iter()
            .map(|(key, profile)| (key.clone(), profile.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = ExchangeRegistry::new().with_defaults();

        let binance = registry.resolve("binance").unwrap();
        assert_eq!(binance.taker_fee_pct, 0.05);
        assert_eq!(binance.funding_summary(), "8 hrs (baseline 0.03%/day)");
        assert!(registry.resolve("mtgox").is_none());
    }

    #[test]
    fn test_unknown_exchange_resolves_to_custom() {
        let registry = ExchangeRegistry::new().with_defaults();
        let profile = registry.resolve_or_custom("mtgox");

        assert_eq!(profile.label, "custom");
        assert_eq!(profile.maker_fee_pct, 0.0);
        assert_eq!(profile.taker_fee_pct, 0.0);
        assert_eq!(profile.funding_interval_hours, 8.0);
        assert_eq!(profile.interest_daily_pct, 0.0);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let registry = ExchangeRegistry::from_json(
            r#"{
                "mexc": { "label": "MEXC", "maker_pct": 0.0, "taker_pct": 0.02 },
                "gate": {
                    "maker_pct": 0.015,
                    "taker_pct": 0.05,
                    "funding_interval_hours": 4,
                    "interest_daily_pct": 0.01
                }
            }"#,
        )
        .unwrap();

        let mexc = registry.resolve("mexc").unwrap();
        assert_eq!(mexc.funding_interval_hours, 8.0);
        assert_eq!(mexc.interest_daily_pct, 0.0);

        let gate = registry.resolve("gate").unwrap();
        assert_eq!(gate.label, "gate");
        assert_eq!(gate.funding_interval_hours, 4.0);

        let keys: Vec<String> = registry.list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gate".to_string(), "mexc".to_string()]);
    }

    #[test]
    fn test_from_json_reads_loose_numbers() {
        let registry = ExchangeRegistry::from_json(
            r#"{
                "kraken": {
                    "label": "Kraken",
                    "maker_pct": null,
                    "taker_pct": "0.05",
                    "funding_interval_hours": "oops",
                    "interest_daily_pct": " 0.02 "
                }
            }"#,
        )
        .unwrap();

        let kraken = registry.resolve("kraken").unwrap();
        assert_eq!(kraken.maker_fee_pct, 0.0);
        assert_eq!(kraken.taker_fee_pct, 0.05);
        assert_eq!(kraken.funding_interval_hours, 8.0);
        assert_eq!(kraken.interest_daily_pct, 0.02);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ExchangeRegistry::from_json("not json").is_err());
    }
}
