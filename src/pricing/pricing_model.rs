use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::pricing_errors::{PriceError, Result};

/// Number of fractional digits a stored price carries.
pub const PRICE_SCALE: u32 = 6;

/// Domain model for one dated price observation of an asset.
///
/// At most one point exists per (asset, date); the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub id: String,
    pub asset_id: String,
    pub price: Decimal,
    pub recorded_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Database model for price points
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PricePointDB {
    pub id: String,
    pub asset_id: String,
    pub price: String,
    pub recorded_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl PricePointDB {
    pub fn build(asset_id: &str, recorded_date: NaiveDate, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            price: price.round_dp(PRICE_SCALE).to_string(),
            recorded_date,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

// Conversion implementations
impl TryFrom<PricePointDB> for PricePoint {
    type Error = PriceError;

    fn try_from(db: PricePointDB) -> Result<Self> {
        let price = Decimal::from_str(&db.price).map_err(|e| {
            PriceError::InvalidData(format!(
                "Price point {} has an unparsable price: {}",
                db.id, e
            ))
        })?;

        Ok(Self {
            id: db.id,
            asset_id: db.asset_id,
            price,
            recorded_date: db.recorded_date,
            created_at: db.created_at,
        })
    }
}

/// Outcome of one ingestion run: per-asset bookkeeping instead of an
/// all-or-nothing result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub run_date: NaiveDate,
    /// Assets that received a new price point.
    pub recorded: Vec<String>,
    /// Assets that already had a point for the run date (idempotent replay).
    pub skipped: Vec<String>,
    /// Assets whose price could not be produced or stored.
    pub failed: Vec<String>,
}

impl IngestionReport {
    pub fn new(run_date: NaiveDate) -> Self {
        Self {
            run_date,
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
