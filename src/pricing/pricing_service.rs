use chrono::{NaiveDate, Utc};
use log::{debug, error, info};
use std::sync::Arc;

use crate::assets::AssetRepositoryTrait;

use super::pricing_errors::{PriceError, Result};
use super::pricing_model::IngestionReport;
use super::pricing_traits::PriceRepositoryTrait;
use super::providers::PriceProvider;

/// Daily price ingestion: appends one price point per tracked asset.
///
/// The run is idempotent per day. Replaying a date hits the store's
/// (asset, date) uniqueness constraint and is recorded as skipped; a failing
/// asset lands on the report's failed list instead of aborting the batch, so
/// retries stay per-asset.
pub struct PriceIngestionService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    provider: Arc<dyn PriceProvider>,
}

impl PriceIngestionService {
    /// Creates a new PriceIngestionService instance
    pub fn new(
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        provider: Arc<dyn PriceProvider>,
    ) -> Self {
        Self {
            asset_repository,
            price_repository,
            provider,
        }
    }

    /// Records today's price for every tracked asset
    pub async fn record_todays_prices(&self) -> Result<IngestionReport> {
        self.record_daily_prices(Utc::now().date_naive()).await
    }

    /// Records one price per tracked asset for the given date
    pub async fn record_daily_prices(&self, run_date: NaiveDate) -> Result<IngestionReport> {
        let assets = self.asset_repository.list()?;
        info!(
            "Starting price ingestion for {} assets on {}",
            assets.len(),
            run_date
        );

        let mut report = IngestionReport::new(run_date);

        for asset in &assets {
            let price = match self.provider.quote(asset, run_date).await {
                Ok(price) => price,
                Err(e) => {
                    error!("Price synthesis failed for asset {}: {}", asset.id, e);
                    report.failed.push(asset.id.clone());
                    continue;
                }
            };

            match self.price_repository.append(&asset.id, run_date, price) {
                Ok(point) => {
                    debug!(
                        "Recorded price {} for asset {} on {}",
                        point.price, asset.id, run_date
                    );
                    report.recorded.push(asset.id.clone());
                }
                Err(PriceError::DuplicatePricePoint(_)) => {
                    // Replay of an already-ingested day; the existing point wins.
                    debug!(
                        "Price for asset {} on {} already recorded, skipping",
                        asset.id, run_date
                    );
                    report.skipped.push(asset.id.clone());
                }
                Err(e) => {
                    error!("Failed to store price for asset {}: {}", asset.id, e);
                    report.failed.push(asset.id.clone());
                }
            }
        }

        info!(
            "Price ingestion for {} finished: {} recorded, {} skipped, {} failed",
            run_date,
            report.recorded.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
