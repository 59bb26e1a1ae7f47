use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::numeric::{lenient_f64, safe_num};

fn default_funding_interval_hours() -> f64 {
    8.0
}

fn lenient_interval<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(safe_num(&value, default_funding_interval_hours()))
}

/// Fee schedule and funding baseline of one exchange.
///
/// Field names on the wire follow the exchange table file format
/// (`maker_pct`, `taker_pct`, ...). Numbers may also be given as strings;
/// unreadable values fall back like request input does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeProfile {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "maker_pct", default, deserialize_with = "lenient_f64")]
    pub maker_fee_pct: f64,
    #[serde(rename = "taker_pct", default, deserialize_with = "lenient_f64")]
    pub taker_fee_pct: f64,
    #[serde(
        default = "default_funding_interval_hours",
        deserialize_with = "lenient_interval"
    )]
    pub funding_interval_hours: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub interest_daily_pct: f64,
}

impl ExchangeProfile {
    pub fn new(
        label: &str,
        maker_fee_pct: f64,
        taker_fee_pct: f64,
        funding_interval_hours: f64,
        interest_daily_pct: f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            maker_fee_pct,
            taker_fee_pct,
            funding_interval_hours,
            interest_daily_pct,
        }
    }

    /// Profile used when the requested exchange is not in the table.
    pub fn custom() -> Self {
        Self::new("custom", 0.0, 0.0, default_funding_interval_hours(), 0.0)
    }

    /// e.g. `8 hrs (baseline 0.03%/day)`
    pub fn funding_summary(&self) -> String {
        format!(
            "{} hrs (baseline {}%/day)",
            self.funding_interval_hours, self.interest_daily_pct
        )
    }
}
