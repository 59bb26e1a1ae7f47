use leverage_calculator::domain::{FeeMode, PositionParameters, Side};
use leverage_calculator::LeverageCalculator;

fn params(side: Side, leverage: f64) -> PositionParameters {
    PositionParameters {
        side,
        margin: 250.0,
        leverage,
        entry_price: 3200.0,
        target_prices: vec![3000.0, 3400.0, 3600.0],
        hold_duration_hours: 72.0,
        fee_mode: FeeMode::Taker,
        maker_fee_pct: 0.02,
        taker_fee_pct: 0.05,
        funding_interval_hours: 8.0,
        interest_daily_pct: 0.03,
        maintenance_margin_pct: 0.5,
    }
}

#[test]
fn test_gate_accepts_valid_and_rejects_non_positive() {
    for leverage in [1.0, 2.0, 10.0, 125.0] {
        assert!(LeverageCalculator::compute(&params(Side::Long, leverage)).is_some());
    }

    let mut p = params(Side::Long, 10.0);
    p.margin = 0.0;
    assert!(LeverageCalculator::compute(&p).is_none());

    let mut p = params(Side::Short, 10.0);
    p.leverage = -3.0;
    assert!(LeverageCalculator::compute(&p).is_none());

    let mut p = params(Side::Short, 10.0);
    p.entry_price = 0.0;
    assert!(LeverageCalculator::compute(&p).is_none());
}

#[test]
fn test_notional_and_quantity() {
    let result = LeverageCalculator::compute(&params(Side::Long, 20.0)).unwrap();

    assert_eq!(result.notional, 250.0 * 20.0);
    assert_eq!(result.quantity, (250.0 * 20.0) / 3200.0);
}

#[test]
fn test_funding_sign_flips_with_side() {
    let long = LeverageCalculator::compute(&params(Side::Long, 10.0)).unwrap();
    let short = LeverageCalculator::compute(&params(Side::Short, 10.0)).unwrap();

    assert!(long.funding_signed > 0.0);
    assert_eq!(long.funding_signed, -short.funding_signed);
    for (l, s) in long.per_target_results.iter().zip(&short.per_target_results) {
        assert_eq!(l.funding, -s.funding);
    }
}

#[test]
fn test_higher_leverage_moves_simple_liquidation_towards_entry() {
    for side in [Side::Long, Side::Short] {
        let mut previous_distance = f64::INFINITY;
        for leverage in [1.0, 2.0, 5.0, 10.0, 50.0, 100.0] {
            let result = LeverageCalculator::compute(&params(side, leverage)).unwrap();
            let distance = (result.liquidation_simple - 3200.0).abs();
            assert!(
                distance < previous_distance,
                "{:?} x{}: {} not closer than {}",
                side,
                leverage,
                distance,
                previous_distance
            );
            previous_distance = distance;
        }
    }
}

#[test]
fn test_compute_is_deterministic() {
    let input = params(Side::Short, 15.0);

    let first = LeverageCalculator::compute(&input).unwrap();
    let second = LeverageCalculator::compute(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.notional.to_bits(), second.notional.to_bits());
    assert_eq!(
        first.liquidation_advanced_with_funding.map(f64::to_bits),
        second.liquidation_advanced_with_funding.map(f64::to_bits)
    );
}

#[test]
fn test_only_valid_targets_evaluated_in_order() {
    let mut input = params(Side::Long, 10.0);
    input.target_prices = vec![0.5, -1.0, f64::NAN, 0.0, 2.0];

    let result = LeverageCalculator::compute(&input).unwrap();
    let targets: Vec<f64> = result
        .per_target_results
        .iter()
        .map(|outcome| outcome.target_price)
        .collect();

    assert_eq!(targets, vec![0.5, 2.0]);
}

#[test]
fn test_zero_interval_means_no_funding() {
    for side in [Side::Long, Side::Short] {
        let mut input = params(side, 10.0);
        input.funding_interval_hours = 0.0;

        let result = LeverageCalculator::compute(&input).unwrap();

        assert_eq!(result.num_intervals, 0.0);
        assert_eq!(result.funding_signed, 0.0);
        assert!(!result.per_interval_frac.is_nan());
        assert_eq!(
            result.liquidation_advanced_no_funding,
            result.liquidation_advanced_with_funding
        );
    }
}

#[test]
fn test_equity_identity_per_target() {
    let input = params(Side::Long, 10.0);
    let result = LeverageCalculator::compute(&input).unwrap();

    for outcome in &result.per_target_results {
        let expected =
            input.margin + outcome.profit_loss - result.fees_estimated - result.funding_signed;
        assert_eq!(outcome.equity, expected);
        assert_eq!(outcome.total_fees, result.fees_estimated);
    }
}

#[test]
fn test_extreme_inputs_yield_non_finite_values() {
    let mut input = params(Side::Long, 10.0);
    input.margin = 1e308;

    let result = LeverageCalculator::compute(&input).unwrap();
    assert!(result.notional.is_infinite());
    assert!(!result.fees_estimated.is_finite());
    assert_eq!(result.per_target_results.len(), 3);

    let mut input = params(Side::Short, 10.0);
    input.entry_price = 1e-320;

    let result = LeverageCalculator::compute(&input).unwrap();
    assert!(result.quantity.is_infinite());
    assert!(result.liquidation_simple.is_finite());
    for outcome in &result.per_target_results {
        assert!(!outcome.equity.is_finite());
    }
}
