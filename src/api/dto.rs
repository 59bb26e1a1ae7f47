use serde::{Deserialize, Serialize};

use crate::domain::{CalculationResult, ExchangeProfile, HistoryEntry};
use crate::infrastructure::StoreBackend;
use crate::services::RawCalculationInput;

// Request DTOs
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub input: RawCalculationInput,
    /// Store the calculation in history (default true).
    pub record: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// Response DTOs
#[derive(Debug, Serialize)]
pub struct ExchangeDto {
    pub key: String,
    pub label: String,
    pub maker_fee_pct: f64,
    pub taker_fee_pct: f64,
    pub funding_interval_hours: f64,
    pub interest_daily_pct: f64,
    pub funding_summary: String,
}

impl ExchangeDto {
    pub fn new(key: &str, profile: &ExchangeProfile) -> Self {
        Self {
            key: key.to_string(),
            label: profile.label.clone(),
            maker_fee_pct: profile.maker_fee_pct,
            taker_fee_pct: profile.taker_fee_pct,
            funding_interval_hours: profile.funding_interval_hours,
            interest_daily_pct: profile.interest_daily_pct,
            funding_summary: profile.funding_summary(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub exchange: String,
    pub exchange_label: String,
    pub coin: String,
    /// Funding-adjusted liquidation when funding applies, fee-only otherwise.
    pub liquidation_price: Option<f64>,
    pub result: CalculationResult,
    pub history_entry: Option<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    pub backend: StoreBackend,
    pub total: usize,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
