use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::assets::Asset;
use crate::pricing::pricing_errors::Result;

/// Source of one daily price per asset.
///
/// The ingestion loop only depends on this contract, so the synthetic
/// random-walk source can be swapped for a real market feed without touching
/// the loop or its partial-failure bookkeeping.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Produces the price for `asset` on the given date.
    async fn quote(&self, asset: &Asset, on: NaiveDate) -> Result<Decimal>;
}
