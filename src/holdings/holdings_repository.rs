use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::assets::{Asset, HoldingSpec};
use crate::assets::assets_model::AssetDB;
use crate::db::get_connection;
use crate::schema::{assets, holdings};

use super::holdings_errors::{HoldingError, Result};
use super::holdings_model::{Holding, HoldingDB, HoldingWithAsset};
use super::holdings_traits::HoldingRepositoryTrait;

/// Repository for managing holding rows in the database
pub struct HoldingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl HoldingRepository {
    /// Creates a new HoldingRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn merge(row: (HoldingDB, AssetDB)) -> Result<HoldingWithAsset> {
        let (holding_db, asset_db) = row;
        let holding = Holding::try_from(holding_db)?;
        let asset = Asset::try_from(asset_db)?;
        Ok(HoldingWithAsset::from_parts(holding, asset))
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    /// Inserts a new holding row for the given user and asset
    fn insert(&self, user_id: &str, asset_id: &str, spec: &HoldingSpec) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;

        let holding_db = HoldingDB::build(user_id, asset_id, spec);
        let row = diesel::insert_into(holdings::table)
            .values(&holding_db)
            .get_result::<HoldingDB>(&mut conn)?;

        Holding::try_from(row)
    }

    /// Lists a user's holdings merged with their asset metadata
    fn list_for_user(&self, user_id: &str) -> Result<Vec<HoldingWithAsset>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings::table
            .inner_join(assets::table)
            .filter(holdings::user_id.eq(user_id))
            .select((HoldingDB::as_select(), AssetDB::as_select()))
            .load::<(HoldingDB, AssetDB)>(&mut conn)?;

        rows.into_iter().map(Self::merge).collect()
    }

    /// Retrieves one of the user's holdings by id
    fn get_for_user(&self, holding_id: &str, user_id: &str) -> Result<HoldingWithAsset> {
        let mut conn = get_connection(&self.pool)?;

        let row = holdings::table
            .inner_join(assets::table)
            .filter(holdings::id.eq(holding_id))
            .filter(holdings::user_id.eq(user_id))
            .select((HoldingDB::as_select(), AssetDB::as_select()))
            .first::<(HoldingDB, AssetDB)>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                HoldingError::NotFound(format!(
                    "Holding {} not found in user's portfolio",
                    holding_id
                ))
            })?;

        Self::merge(row)
    }

    /// Deletes the holding scoped by owner. Returns the number of rows removed.
    fn delete(&self, holding_id: &str, user_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        let deleted = diesel::delete(
            holdings::table
                .filter(holdings::id.eq(holding_id))
                .filter(holdings::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
