use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::assets::Asset;
use crate::pricing::pricing_errors::{PriceError, Result};
use crate::pricing::pricing_model::PRICE_SCALE;
use crate::pricing::pricing_traits::PriceRepositoryTrait;

use super::price_provider::PriceProvider;

/// Maximum relative move per day, in either direction.
const MAX_DAILY_DRIFT: f64 = 0.05;
/// First-listing seed prices fall in [SEED_MIN, SEED_MIN + SEED_SPAN).
const SEED_MIN: f64 = 1.0;
const SEED_SPAN: f64 = 999.0;

/// Synthetic price source modelling a bounded random walk.
///
/// An asset with a recorded price moves by a uniform factor within
/// ±`MAX_DAILY_DRIFT` of its prior price; an asset with no price history
/// is seeded with a bounded random value, modelling a first listing.
pub struct RandomWalkProvider {
    repository: Arc<dyn PriceRepositoryTrait>,
}

impl RandomWalkProvider {
    pub fn new(repository: Arc<dyn PriceRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn to_decimal(value: f64) -> Result<Decimal> {
        Decimal::from_f64_retain(value).ok_or_else(|| {
            PriceError::ProviderError(format!("Cannot represent {} as a decimal", value))
        })
    }
}

#[async_trait]
impl PriceProvider for RandomWalkProvider {
    async fn quote(&self, asset: &Asset, _on: NaiveDate) -> Result<Decimal> {
        let previous = self.repository.latest(&asset.id)?;

        let price = match previous {
            Some(point) => {
                let drift: f64 = rand::thread_rng().gen_range(-MAX_DAILY_DRIFT..=MAX_DAILY_DRIFT);
                point.price * Self::to_decimal(1.0 + drift)?
            }
            None => Self::to_decimal(rand::thread_rng().gen_range(SEED_MIN..SEED_MIN + SEED_SPAN))?,
        };

        Ok(price.round_dp(PRICE_SCALE))
    }
}
