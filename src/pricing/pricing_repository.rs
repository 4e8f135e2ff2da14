use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::asset_prices;

use super::pricing_errors::Result;
use super::pricing_model::{PricePoint, PricePointDB};
use super::pricing_traits::PriceRepositoryTrait;

/// Repository for the append-only price store
pub struct PriceRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PriceRepository {
    /// Creates a new PriceRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl PriceRepositoryTrait for PriceRepository {
    fn append(
        &self,
        asset_id: &str,
        recorded_date: NaiveDate,
        price: Decimal,
    ) -> Result<PricePoint> {
        let mut conn = get_connection(&self.pool)?;

        let point_db = PricePointDB::build(asset_id, recorded_date, price);
        // The UNIQUE (asset_id, recorded_date) constraint is the only guard
        // against replays and races; its violation maps to DuplicatePricePoint.
        let row = diesel::insert_into(asset_prices::table)
            .values(&point_db)
            .get_result::<PricePointDB>(&mut conn)?;

        PricePoint::try_from(row)
    }

    fn latest(&self, asset_id: &str) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let row = asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .order(asset_prices::recorded_date.desc())
            .first::<PricePointDB>(&mut conn)
            .optional()?;

        row.map(PricePoint::try_from).transpose()
    }

    fn earliest(&self, asset_id: &str) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let row = asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .order(asset_prices::recorded_date.asc())
            .first::<PricePointDB>(&mut conn)
            .optional()?;

        row.map(PricePoint::try_from).transpose()
    }

    fn series(
        &self,
        asset_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .into_boxed();

        if let Some(start) = start_date {
            query = query.filter(asset_prices::recorded_date.ge(start));
        }
        if let Some(end) = end_date {
            query = query.filter(asset_prices::recorded_date.le(end));
        }

        let rows = query
            .order(asset_prices::recorded_date.asc())
            .load::<PricePointDB>(&mut conn)?;

        rows.into_iter().map(PricePoint::try_from).collect()
    }
}
