use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::pricing_errors::Result;
use super::pricing_model::PricePoint;

/// Trait defining the contract for the append-only price store.
pub trait PriceRepositoryTrait: Send + Sync {
    /// Appends one price point. A point already recorded for the same
    /// (asset, date) surfaces as `PriceError::DuplicatePricePoint`.
    fn append(&self, asset_id: &str, recorded_date: NaiveDate, price: Decimal)
        -> Result<PricePoint>;
    fn latest(&self, asset_id: &str) -> Result<Option<PricePoint>>;
    fn earliest(&self, asset_id: &str) -> Result<Option<PricePoint>>;
    /// Date-ascending price series, optionally bounded on either end.
    fn series(
        &self,
        asset_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>>;
}
