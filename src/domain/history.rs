use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::numeric::finite_or_null;
use super::{CalculationResult, PositionParameters, Side};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoryExample {
    #[serde(with = "finite_or_null")]
    pub profit_loss: f64,
    #[serde(with = "finite_or_null")]
    pub equity: f64,
}

/// Snapshot of one calculation kept for display and export.
///
/// Numeric fields may be non-computable (overflowed inputs); they are stored
/// as `null` and read back as NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub exchange: String,
    pub coin: String,
    pub side: Side,
    #[serde(with = "finite_or_null")]
    pub margin: f64,
    #[serde(with = "finite_or_null")]
    pub leverage: f64,
    #[serde(with = "finite_or_null")]
    pub entry_price: f64,
    #[serde(with = "finite_or_null")]
    pub notional: f64,
    #[serde(with = "finite_or_null")]
    pub quantity: f64,
    pub liquidation_price: Option<f64>,
    #[serde(with = "finite_or_null")]
    pub fees_estimated: f64,
    #[serde(with = "finite_or_null")]
    pub funding: f64,
    pub targets: Vec<f64>,
    pub example: Option<HistoryExample>,
    #[serde(default)]
    pub note: String,
}

impl HistoryEntry {
    pub fn from_calculation(
        exchange: &str,
        coin: &str,
        note: &str,
        params: &PositionParameters,
        result: &CalculationResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: Utc::now(),
            exchange: exchange.to_string(),
            coin: coin.to_string(),
            side: params.side,
            margin: params.margin,
            leverage: params.leverage,
            entry_price: params.entry_price,
            notional: result.notional,
            quantity: result.quantity,
            liquidation_price: result.preferred_liquidation(),
            fees_estimated: result.fees_estimated,
            funding: result.funding_signed,
            targets: params.target_prices.clone(),
            example: result.example_outcome().map(|outcome| HistoryExample {
                profit_loss: outcome.profit_loss,
                equity: outcome.equity,
            }),
            note: note.to_string(),
        }
    }
}
