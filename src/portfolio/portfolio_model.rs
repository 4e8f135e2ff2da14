use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One day of a holding's valuation history. Computed on demand, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: NaiveDate,
    /// Price rendered with six fractional digits.
    pub price: String,
    /// Position value, rounded to whole units.
    pub value: Decimal,
    /// Change in value versus the previous day, rounded to whole units.
    pub daily_pnl: Decimal,
    /// Running sum of the unrounded daily deltas, rounded to whole units.
    pub cumulative_pnl: Decimal,
    /// Price-relative return since the first day, rounded to 2 decimals.
    pub cumulative_pnl_percentage: Decimal,
}

/// A holding's full history plus its summary PnL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistory {
    pub history: Vec<HistoryEntry>,
    /// Effective quantity rendered with six fractional digits.
    pub quantity: String,
    pub overall_pnl: Decimal,
    pub overall_pnl_percentage: Decimal,
}

/// A user's whole portfolio reduced to one valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub pnl: Decimal,
    pub pnl_percentage: Decimal,
}

impl PortfolioSummary {
    pub fn empty() -> Self {
        Self {
            total_value: Decimal::ZERO,
            pnl: Decimal::ZERO,
            pnl_percentage: Decimal::ZERO,
        }
    }
}

/// Monetary magnitudes are reported in whole units.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Percentages are reported with two decimal places.
pub(crate) fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Boundary rounding for portfolio totals.
pub(crate) fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices render with six fractional digits.
pub(crate) fn format_price(price: Decimal) -> String {
    format!(
        "{:.6}",
        price.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Quantities render with six fractional digits.
pub(crate) fn format_quantity(quantity: Decimal) -> String {
    format!(
        "{:.6}",
        quantity.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub(crate) const HUNDRED: Decimal = dec!(100);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case() {
        let summary = PortfolioSummary {
            total_value: dec!(1155.00),
            pnl: dec!(55.00),
            pnl_percentage: dec!(5.00),
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert!(json.get("totalValue").is_some());
        assert!(json.get("pnlPercentage").is_some());
    }

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.5)), dec!(1));
        assert_eq!(round_money(dec!(-0.5)), dec!(-1));
        assert_eq!(round_percentage(dec!(10.005)), dec!(10.01));
        assert_eq!(format_price(dec!(123.4)), "123.400000");
    }
}
