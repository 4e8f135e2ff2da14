use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{error, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::holdings::{HoldingRepositoryTrait, HoldingWithAsset};
use crate::pricing::PriceRepositoryTrait;

use super::history_calculator::calculate_history;
use super::portfolio_errors::{PortfolioError, Result};
use super::portfolio_model::{
    round_currency, round_percentage, AssetHistory, PortfolioSummary, HUNDRED,
};

/// Upper bound on holdings whose price pairs are fetched at once.
const MAX_CONCURRENT_PRICE_LOOKUPS: usize = 8;

struct Contribution {
    value: Decimal,
    cost: Decimal,
}

/// Read-side service over a user's holdings: per-holding valuation history
/// and the cross-asset portfolio reduction. Never mutates the stores.
pub struct PortfolioService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
    ) -> Self {
        Self {
            holding_repository,
            price_repository,
        }
    }

    /// Computes the valuation/PnL history for one of the user's holdings,
    /// optionally bounded by a date range.
    pub fn get_holding_history(
        &self,
        user_id: &str,
        holding_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<AssetHistory> {
        let holding = self.holding_repository.get_for_user(holding_id, user_id)?;
        let quantity = holding.effective_quantity()?;

        let series = self
            .price_repository
            .series(&holding.asset_id, start_date, end_date)?;

        calculate_history(&series, quantity)
    }

    /// Reduces every holding of the user to one total value and PnL.
    ///
    /// All-or-nothing: any store failure aborts the whole call, unlike the
    /// ingestion process's per-asset bookkeeping. Holdings without any
    /// recorded price contribute zero and only produce a warning.
    pub async fn get_portfolio_summary(&self, user_id: &str) -> Result<PortfolioSummary> {
        let holdings = self.holding_repository.list_for_user(user_id)?;

        // Fast path: no holdings means no price-store traffic at all.
        if holdings.is_empty() {
            return Ok(PortfolioSummary::empty());
        }

        let contributions = stream::iter(
            holdings
                .into_iter()
                .map(|holding| self.holding_contribution(holding)),
        )
        .buffer_unordered(MAX_CONCURRENT_PRICE_LOOKUPS)
        .try_collect::<Vec<_>>()
        .await
        .map_err(|e| {
            error!("Portfolio aggregation failed for user {}: {}", user_id, e);
            PortfolioError::Aggregation(e.to_string())
        })?;

        let mut total_value = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        for contribution in contributions.into_iter().flatten() {
            total_value += contribution.value;
            total_cost += contribution.cost;
        }

        let pnl = total_value - total_cost;
        let pnl_percentage = if total_cost.is_zero() {
            Decimal::ZERO
        } else {
            pnl / total_cost * HUNDRED
        };

        Ok(PortfolioSummary {
            total_value: round_currency(total_value),
            pnl: round_currency(pnl),
            pnl_percentage: round_percentage(pnl_percentage),
        })
    }

    /// Fetches a holding's newest and oldest price concurrently and scales
    /// both by its effective quantity. `None` means the asset has no price
    /// on at least one end and is skipped by the reduction.
    async fn holding_contribution(&self, holding: HoldingWithAsset) -> Result<Option<Contribution>> {
        let quantity = holding.effective_quantity()?;

        let latest_repository = Arc::clone(&self.price_repository);
        let earliest_repository = Arc::clone(&self.price_repository);
        let latest_asset_id = holding.asset_id.clone();
        let earliest_asset_id = holding.asset_id.clone();

        let (latest, earliest) = tokio::try_join!(
            tokio::task::spawn_blocking(move || latest_repository.latest(&latest_asset_id)),
            tokio::task::spawn_blocking(move || earliest_repository.earliest(&earliest_asset_id)),
        )
        .map_err(|e| PortfolioError::Aggregation(format!("Price lookup task failed: {}", e)))?;

        match (latest?, earliest?) {
            (Some(latest), Some(earliest)) => Ok(Some(Contribution {
                value: latest.price * quantity,
                cost: earliest.price * quantity,
            })),
            _ => {
                warn!(
                    "Holding {} (asset {}) has no recorded prices, contributing zero",
                    holding.id, holding.asset_id
                );
                Ok(None)
            }
        }
    }
}
