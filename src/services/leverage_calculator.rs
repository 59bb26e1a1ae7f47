use crate::domain::{CalculationResult, PositionParameters, Side, TargetOutcome};

/// Funding settlements per day assumed when the interval is not positive.
const FALLBACK_INTERVALS_PER_DAY: f64 = 24.0;

pub struct LeverageCalculator;

impl LeverageCalculator {
    /// Run the full calculation for one position.
    ///
    /// Returns `None` when margin, leverage or entry price is not a positive
    /// finite number. Every other degenerate case is reported inside the
    /// result (`None` liquidation prices, non-finite values) instead.
    pub fn compute(params: &PositionParameters) -> Option<CalculationResult> {
        if !is_positive(params.margin)
            || !is_positive(params.leverage)
            || !is_positive(params.entry_price)
        {
            return None;
        }

        let side = params.side;
        let margin = params.margin;
        let entry_price = params.entry_price;

        let notional = Self::calculate_notional(margin, params.leverage);
        let quantity = Self::calculate_quantity(notional, entry_price);
        let liquidation_simple =
            Self::calculate_liquidation_price_simple(side, entry_price, params.leverage);

        let fee_frac = pct_to_frac(params.selected_fee_pct());
        let fee_on_enter = notional * fee_frac;
        let fee_on_exit = notional * fee_frac;
        let fees_estimated = fee_on_enter + fee_on_exit;

        let per_interval_frac = Self::calculate_per_interval_frac(
            params.interest_daily_pct,
            params.funding_interval_hours,
        );
        let num_intervals = Self::calculate_num_intervals(
            params.hold_duration_hours,
            params.funding_interval_hours,
        );
        let funding_signed =
            Self::calculate_funding_signed(side, notional, per_interval_frac, num_intervals);

        let maint_frac = pct_to_frac(params.maintenance_margin_pct);
        let base_term = maint_frac * notional - margin + fees_estimated;

        let liquidation_advanced_no_funding =
            Self::calculate_liquidation_price_advanced(side, entry_price, quantity, base_term);
        let liquidation_advanced_with_funding = Self::calculate_liquidation_price_advanced(
            side,
            entry_price,
            quantity,
            base_term + funding_signed,
        );

        let per_target_results = params
            .target_prices
            .iter()
            .copied()
            .filter(|t| is_positive(*t))
            .map(|target_price| {
                let profit_loss =
                    Self::calculate_profit_loss(side, entry_price, target_price, quantity);
                TargetOutcome {
                    target_price,
                    profit_loss,
                    equity: margin + profit_loss - fees_estimated - funding_signed,
                    total_fees: fees_estimated,
                    funding: funding_signed,
                }
            })
            .collect();

        Some(CalculationResult {
            notional,
            quantity,
            liquidation_simple,
            liquidation_advanced_no_funding,
            liquidation_advanced_with_funding,
            fees_estimated,
            fee_on_enter,
            fee_on_exit,
            fee_frac,
            funding_signed,
            funding_interval_hours: params.funding_interval_hours,
            interest_daily_pct: params.interest_daily_pct,
            per_interval_frac,
            num_intervals,
            per_target_results,
        })
    }

    /// Formula: margin × leverage
    pub fn calculate_notional(margin: f64, leverage: f64) -> f64 {
        margin * leverage
    }

    /// Formula: notional / entry_price, 0 when the entry price is not positive
    pub fn calculate_quantity(notional: f64, entry_price: f64) -> f64 {
        if entry_price > 0.0 {
            notional / entry_price
        } else {
            0.0
        }
    }

    /// Leverage-only estimate, ignoring fees, funding and maintenance margin.
    /// Long: entry_price × (1 - 1/leverage)
    /// Short: entry_price × (1 + 1/leverage)
    pub fn calculate_liquidation_price_simple(side: Side, entry_price: f64, leverage: f64) -> f64 {
        let leverage_factor = 1.0 / leverage;
        match side {
            Side::Long => entry_price * (1.0 - leverage_factor),
            Side::Short => entry_price * (1.0 + leverage_factor),
        }
    }

    /// Daily interest spread evenly over the settlements of one day.
    /// Formula: (interest_daily_pct / 100) / (24 / interval_hours)
    pub fn calculate_per_interval_frac(
        interest_daily_pct: f64,
        funding_interval_hours: f64,
    ) -> f64 {
        let intervals_per_day = if funding_interval_hours > 0.0 {
            24.0 / funding_interval_hours
        } else {
            FALLBACK_INTERVALS_PER_DAY
        };
        pct_to_frac(interest_daily_pct) / intervals_per_day
    }

    /// Formula: hold_hours / interval_hours, 0 when the interval is not positive
    pub fn calculate_num_intervals(hold_duration_hours: f64, funding_interval_hours: f64) -> f64 {
        if funding_interval_hours > 0.0 {
            hold_duration_hours / funding_interval_hours
        } else {
            0.0
        }
    }

    /// Baseline funding over the holding period, signed from the holder's
    /// view: longs pay (+), shorts receive (-).
    pub fn calculate_funding_signed(
        side: Side,
        notional: f64,
        per_interval_frac: f64,
        num_intervals: f64,
    ) -> f64 {
        let baseline = notional * per_interval_frac * num_intervals;
        match side {
            Side::Long => baseline,
            Side::Short => -baseline,
        }
    }

    /// Price at which equity reaches the maintenance threshold.
    /// `base_term` is maint × notional - margin + fees (+ funding), the
    /// dollar deficit that the adverse move has to cover.
    /// Long: entry_price + base_term / quantity
    /// Short: entry_price - base_term / quantity
    pub fn calculate_liquidation_price_advanced(
        side: Side,
        entry_price: f64,
        quantity: f64,
        base_term: f64,
    ) -> Option<f64> {
        if quantity <= 0.0 || quantity.is_nan() {
            return None;
        }

        let price_delta = base_term / quantity;
        Some(match side {
            Side::Long => entry_price + price_delta,
            Side::Short => entry_price - price_delta,
        })
    }

    /// Long: (target - entry) × quantity
    /// Short: (entry - target) × quantity
    pub fn calculate_profit_loss(
        side: Side,
        entry_price: f64,
        target_price: f64,
        quantity: f64,
    ) -> f64 {
        match side {
            Side::Long => (target_price - entry_price) * quantity,
            Side::Short => (entry_price - target_price) * quantity,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn pct_to_frac(pct: f64) -> f64 {
    pct / 100.0
}
