use serde::{Deserialize, Serialize};

/// Outcome of closing the position at one target price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TargetOutcome {
    pub target_price: f64,
    pub profit_loss: f64,
    pub equity: f64,
    pub total_fees: f64,
    pub funding: f64,
}

/// Result of one calculation. Liquidation prices that cannot be computed
/// (zero quantity) are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationResult {
    pub notional: f64,
    pub quantity: f64,
    pub liquidation_simple: f64,
    pub liquidation_advanced_no_funding: Option<f64>,
    pub liquidation_advanced_with_funding: Option<f64>,
    pub fees_estimated: f64,
    pub fee_on_enter: f64,
    pub fee_on_exit: f64,
    pub fee_frac: f64,
    /// Positive is a cost for longs, negative a credit for shorts.
    pub funding_signed: f64,
    pub funding_interval_hours: f64,
    pub interest_daily_pct: f64,
    pub per_interval_frac: f64,
    pub num_intervals: f64,
    pub per_target_results: Vec<TargetOutcome>,
}

impl CalculationResult {
    /// Liquidation price to show: the funding-adjusted one when funding is
    /// non-zero and computable, the fee-only one otherwise.
    pub fn preferred_liquidation(&self) -> Option<f64> {
        match self.liquidation_advanced_with_funding {
            Some(with_funding) if self.funding_signed.abs() > 0.0 && with_funding.is_finite() => {
                Some(with_funding)
            }
            _ => self.liquidation_advanced_no_funding,
        }
    }

    /// First evaluated target, used as the headline equity figure.
    pub fn example_outcome(&self) -> Option<&TargetOutcome> {
        self.per_target_results.first()
    }
}
