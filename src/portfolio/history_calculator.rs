use rust_decimal::Decimal;

use crate::pricing::PricePoint;

use super::portfolio_errors::{PortfolioError, Result};
use super::portfolio_model::{
    format_price, format_quantity, round_money, round_percentage, AssetHistory, HistoryEntry,
    HUNDRED,
};

/// Turns a date-ascending price series and an effective quantity into the
/// holding's valuation history and summary PnL.
///
/// Pure computation: no I/O, no suspension points. The series must already
/// be ordered ascending by date; the caller fetches it that way.
///
/// The cumulative and overall PnL percentages are price-relative, not
/// value-relative: they express the instrument's return independent of
/// position size, while the absolute PnL figures are quantity-scaled.
pub fn calculate_history(
    series: &[PricePoint],
    effective_quantity: Decimal,
) -> Result<AssetHistory> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        // No points in range is a valid state, reported as an empty result.
        _ => {
            return Ok(AssetHistory {
                history: Vec::new(),
                quantity: format_quantity(effective_quantity),
                overall_pnl: Decimal::ZERO,
                overall_pnl_percentage: Decimal::ZERO,
            })
        }
    };

    let initial_price = first.price;
    if initial_price <= Decimal::ZERO {
        return Err(PortfolioError::DegenerateSeries(format!(
            "First price {} on {} for asset {} is not positive",
            initial_price, first.recorded_date, first.asset_id
        )));
    }

    let mut history = Vec::with_capacity(series.len());
    let mut cumulative_pnl = Decimal::ZERO;
    let mut previous_value: Option<Decimal> = None;

    for point in series {
        let value = point.price * effective_quantity;
        let daily_pnl = match previous_value {
            Some(previous) => value - previous,
            None => Decimal::ZERO,
        };
        // Accumulate the unrounded delta; rounding only happens on output.
        cumulative_pnl += daily_pnl;
        let cumulative_pnl_percentage = (point.price - initial_price) / initial_price * HUNDRED;

        history.push(HistoryEntry {
            date: point.recorded_date,
            price: format_price(point.price),
            value: round_money(value),
            daily_pnl: round_money(daily_pnl),
            cumulative_pnl: round_money(cumulative_pnl),
            cumulative_pnl_percentage: round_percentage(cumulative_pnl_percentage),
        });

        previous_value = Some(value);
    }

    let overall_pnl = (last.price - initial_price) * effective_quantity;
    let overall_pnl_percentage = (last.price - initial_price) / initial_price * HUNDRED;

    Ok(AssetHistory {
        history,
        quantity: format_quantity(effective_quantity),
        overall_pnl: round_money(overall_pnl),
        overall_pnl_percentage: round_percentage(overall_pnl_percentage),
    })
}
