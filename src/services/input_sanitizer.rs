//! Parse-or-default layer between loosely typed client input and the
//! calculator. Nothing in here rejects a request; bad values fall back to
//! defaults and the calculator's own gate decides whether a result exists.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::numeric::{safe_num, safe_opt_num};
use crate::domain::{
    ExchangeProfile, FeeMode, HoldUnit, PositionParameters, Side, DEFAULT_MAINTENANCE_MARGIN_PCT,
};

/// Calculation request as sent by a front end. Numeric fields may arrive as
/// numbers, numeric strings, empty strings or be missing entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCalculationInput {
    pub exchange: Option<String>,
    pub coin: Option<String>,
    pub side: Option<String>,
    pub margin: Option<Value>,
    pub leverage: Option<Value>,
    pub entry_price: Option<Value>,
    #[serde(default)]
    pub targets: Vec<Value>,
    pub hold_duration: Option<Value>,
    pub hold_unit: Option<String>,
    pub fee_mode: Option<String>,
    pub maintenance_margin_pct: Option<Value>,
    pub maker_fee_pct: Option<Value>,
    pub taker_fee_pct: Option<Value>,
    pub funding_interval_hours: Option<Value>,
    pub interest_daily_pct: Option<Value>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedInput {
    pub coin: String,
    pub note: String,
    pub params: PositionParameters,
}

/// Keep the strictly positive, finite targets in their original order.
pub fn sanitize_targets(values: &[Value]) -> Vec<f64> {
    values
        .iter()
        .map(|v| safe_num(v, f64::NAN))
        .filter(|t| t.is_finite() && *t > 0.0)
        .collect()
}

fn parse_or_default<T>(field: &str, value: Option<&str>) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value.map(str::parse::<T>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            debug!("{}: {}, using default", field, e);
            T::default()
        }
        None => T::default(),
    }
}

pub struct InputSanitizer;

impl InputSanitizer {
    /// Build calculator parameters from raw input and the resolved exchange
    /// profile. Fee and funding overrides in the request win over the profile.
    pub fn sanitize(raw: &RawCalculationInput, profile: &ExchangeProfile) -> SanitizedInput {
        let side: Side = parse_or_default("side", raw.side.as_deref());
        let fee_mode: FeeMode = parse_or_default("fee_mode", raw.fee_mode.as_deref());
        let hold_unit: HoldUnit = parse_or_default("hold_unit", raw.hold_unit.as_deref());

        let hold_duration = safe_opt_num(raw.hold_duration.as_ref(), 0.0);

        let params = PositionParameters {
            side,
            margin: safe_opt_num(raw.margin.as_ref(), 0.0),
            leverage: safe_opt_num(raw.leverage.as_ref(), 1.0),
            entry_price: safe_opt_num(raw.entry_price.as_ref(), 0.0),
            target_prices: sanitize_targets(&raw.targets),
            hold_duration_hours: hold_unit.to_hours(hold_duration),
            fee_mode,
            maker_fee_pct: safe_opt_num(raw.maker_fee_pct.as_ref(), profile.maker_fee_pct),
            taker_fee_pct: safe_opt_num(raw.taker_fee_pct.as_ref(), profile.taker_fee_pct),
            funding_interval_hours: safe_opt_num(
                raw.funding_interval_hours.as_ref(),
                profile.funding_interval_hours,
            ),
            interest_daily_pct: safe_opt_num(
                raw.interest_daily_pct.as_ref(),
                profile.interest_daily_pct,
            ),
            maintenance_margin_pct: safe_opt_num(
                raw.maintenance_margin_pct.as_ref(),
                DEFAULT_MAINTENANCE_MARGIN_PCT,
            ),
        };

        let coin = raw
            .coin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("-")
            .to_string();

        SanitizedInput {
            coin,
            note: raw.note.clone().unwrap_or_default(),
            params,
        }
    }
}
