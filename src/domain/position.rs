use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maintenance margin, in percent of notional.
pub const DEFAULT_MAINTENANCE_MARGIN_PCT: f64 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// Which fee tier is charged on both the entry and the exit leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    Maker,
    #[default]
    Taker,
}

impl FromStr for FeeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maker" => Ok(FeeMode::Maker),
            "taker" => Ok(FeeMode::Taker),
            other => Err(format!("unknown fee mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoldUnit {
    #[default]
    Hours,
    Days,
}

impl HoldUnit {
    pub fn to_hours(&self, duration: f64) -> f64 {
        match self {
            HoldUnit::Hours => duration,
            HoldUnit::Days => duration * 24.0,
        }
    }
}

impl FromStr for HoldUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hours" | "hour" | "h" => Ok(HoldUnit::Hours),
            "days" | "day" | "d" => Ok(HoldUnit::Days),
            other => Err(format!("unknown hold unit: {}", other)),
        }
    }
}

/// Everything the calculator needs for one position.
///
/// Percent fields are percentages as quoted by exchanges (`0.05` means 0.05%),
/// not fractions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionParameters {
    pub side: Side,
    pub margin: f64,
    pub leverage: f64,
    pub entry_price: f64,
    pub target_prices: Vec<f64>,
    pub hold_duration_hours: f64,
    pub fee_mode: FeeMode,
    pub maker_fee_pct: f64,
    pub taker_fee_pct: f64,
    pub funding_interval_hours: f64,
    pub interest_daily_pct: f64,
    pub maintenance_margin_pct: f64,
}

impl Default for PositionParameters {
    fn default() -> Self {
        Self {
            side: Side::Long,
            margin: 0.0,
            leverage: 1.0,
            entry_price: 0.0,
            target_prices: Vec::new(),
            hold_duration_hours: 0.0,
            fee_mode: FeeMode::Taker,
            maker_fee_pct: 0.0,
            taker_fee_pct: 0.0,
            funding_interval_hours: 8.0,
            interest_daily_pct: 0.0,
            maintenance_margin_pct: DEFAULT_MAINTENANCE_MARGIN_PCT,
        }
    }
}

impl PositionParameters {
    /// Fee percentage selected by `fee_mode`.
    pub fn selected_fee_pct(&self) -> f64 {
        match self.fee_mode {
            FeeMode::Maker => self.maker_fee_pct,
            FeeMode::Taker => self.taker_fee_pct,
        }
    }
}
