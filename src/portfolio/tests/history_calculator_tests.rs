use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::portfolio::history_calculator::calculate_history;
use crate::portfolio::portfolio_errors::PortfolioError;
use crate::pricing::PricePoint;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, n).unwrap()
}

fn series(prices: &[Decimal]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| PricePoint {
            id: format!("pp-{}", i),
            asset_id: "asset-1".to_string(),
            price: *price,
            recorded_date: day(1 + i as u32),
            created_at: chrono::Utc::now().naive_utc(),
        })
        .collect()
}

#[test]
fn computes_daily_and_cumulative_pnl_for_fungible_position() {
    let series = series(&[dec!(100), dec!(110), dec!(105)]);

    let result = calculate_history(&series, dec!(10)).unwrap();

    assert_eq!(result.history.len(), 3);

    let values: Vec<Decimal> = result.history.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![dec!(1000), dec!(1100), dec!(1050)]);

    let daily: Vec<Decimal> = result.history.iter().map(|e| e.daily_pnl).collect();
    assert_eq!(daily, vec![dec!(0), dec!(100), dec!(-50)]);

    let cumulative: Vec<Decimal> = result.history.iter().map(|e| e.cumulative_pnl).collect();
    assert_eq!(cumulative, vec![dec!(0), dec!(100), dec!(50)]);

    let percentages: Vec<Decimal> = result
        .history
        .iter()
        .map(|e| e.cumulative_pnl_percentage)
        .collect();
    assert_eq!(percentages, vec![dec!(0.00), dec!(10.00), dec!(5.00)]);

    assert_eq!(result.overall_pnl, dec!(50));
    assert_eq!(result.overall_pnl_percentage, dec!(5.00));
    assert_eq!(result.quantity, "10.000000");
}

#[test]
fn pnl_percentage_is_price_relative_regardless_of_quantity() {
    // The percentage tracks the instrument, not the position: scaling the
    // quantity changes the absolute PnL but leaves every percentage intact.
    let series = series(&[dec!(100), dec!(110), dec!(105)]);

    let small = calculate_history(&series, dec!(1)).unwrap();
    let large = calculate_history(&series, dec!(1000)).unwrap();

    for (a, b) in small.history.iter().zip(large.history.iter()) {
        assert_eq!(a.cumulative_pnl_percentage, b.cumulative_pnl_percentage);
    }
    assert_eq!(small.overall_pnl_percentage, large.overall_pnl_percentage);

    assert_eq!(small.overall_pnl, dec!(5));
    assert_eq!(large.overall_pnl, dec!(5000));
}

#[test]
fn unique_holding_uses_effective_quantity_of_one() {
    let series = series(&[dec!(100), dec!(110)]);

    let result = calculate_history(&series, Decimal::ONE).unwrap();

    assert_eq!(result.history[1].value, dec!(110));
    assert_eq!(result.overall_pnl, dec!(10));
    assert_eq!(result.quantity, "1.000000");
}

#[test]
fn empty_series_yields_empty_result_with_quantity() {
    let result = calculate_history(&[], dec!(42.5)).unwrap();

    assert!(result.history.is_empty());
    assert_eq!(result.overall_pnl, Decimal::ZERO);
    assert_eq!(result.overall_pnl_percentage, Decimal::ZERO);
    assert_eq!(result.quantity, "42.500000");
}

#[test]
fn single_point_series_has_zero_pnl() {
    let series = series(&[dec!(100)]);

    let result = calculate_history(&series, dec!(3)).unwrap();

    assert_eq!(result.history.len(), 1);
    assert_eq!(result.history[0].daily_pnl, Decimal::ZERO);
    assert_eq!(result.history[0].cumulative_pnl, Decimal::ZERO);
    assert_eq!(result.overall_pnl, Decimal::ZERO);
    assert_eq!(result.overall_pnl_percentage, dec!(0.00));
}

#[test]
fn zero_first_price_is_a_degenerate_series() {
    let series = series(&[dec!(0), dec!(10)]);

    let result = calculate_history(&series, dec!(1));

    assert!(matches!(result, Err(PortfolioError::DegenerateSeries(_))));
}

#[test]
fn prices_render_with_six_fractional_digits() {
    let series = series(&[dec!(123.4), dec!(123.456789)]);

    let result = calculate_history(&series, dec!(1)).unwrap();

    assert_eq!(result.history[0].price, "123.400000");
    assert_eq!(result.history[1].price, "123.456789");
}

#[test]
fn cumulative_pnl_accumulates_unrounded_deltas() {
    // Two +0.4 daily moves round to zero individually but their sum does
    // not: day three must report the accumulated value, proving rounding
    // happens on output rather than in the accumulator.
    let series = series(&[dec!(100.0), dec!(100.4), dec!(100.8)]);

    let result = calculate_history(&series, dec!(1)).unwrap();

    assert_eq!(result.history[1].daily_pnl, Decimal::ZERO);
    assert_eq!(result.history[2].daily_pnl, Decimal::ZERO);
    assert_eq!(result.history[2].cumulative_pnl, dec!(1));
}
