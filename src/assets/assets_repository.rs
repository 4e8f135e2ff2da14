use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::db::{get_connection, DbConnection};
use crate::schema::{assets, holdings};

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetDB, AssetKind, NewAsset};
use super::assets_traits::AssetRepositoryTrait;

/// Repository for managing asset data in the database
pub struct AssetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl AssetRepository {
    /// Creates a new AssetRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn find_by_natural_key_conn(
        &self,
        conn: &mut DbConnection,
        contract_address: &str,
        chain: &str,
        kind: AssetKind,
    ) -> Result<Option<Asset>> {
        let row = assets::table
            .filter(assets::contract_address.eq(contract_address))
            .filter(assets::chain.eq(chain))
            .filter(assets::asset_kind.eq(kind.as_str()))
            .first::<AssetDB>(conn)
            .optional()?;

        row.map(Asset::try_from).transpose()
    }
}

impl AssetRepositoryTrait for AssetRepository {
    /// Returns the asset identified by the (contract_address, chain, kind)
    /// natural key, inserting it first if it does not exist yet.
    ///
    /// A concurrent insert of the same key is resolved by the unique
    /// constraint: the loser re-reads and returns the winner's row.
    fn find_or_create(&self, new_asset: NewAsset) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        if let Some(existing) = self.find_by_natural_key_conn(
            &mut conn,
            &new_asset.contract_address,
            &new_asset.chain,
            new_asset.asset_kind,
        )? {
            debug!(
                "Asset already tracked for {}/{}, reusing {}",
                new_asset.chain, new_asset.contract_address, existing.id
            );
            return Ok(existing);
        }

        let asset_db: AssetDB = new_asset.clone().into();
        match diesel::insert_into(assets::table)
            .values(&asset_db)
            .get_result::<AssetDB>(&mut conn)
        {
            Ok(row) => Ok(Asset::try_from(row)?),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => self
                .find_by_natural_key_conn(
                    &mut conn,
                    &new_asset.contract_address,
                    &new_asset.chain,
                    new_asset.asset_kind,
                )?
                .ok_or_else(|| {
                    AssetError::DatabaseError(
                        "Asset vanished after unique-key conflict".to_string(),
                    )
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves an asset by its ID
    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        let row = assets::table.find(asset_id).first::<AssetDB>(&mut conn)?;

        Asset::try_from(row)
    }

    /// Lists all tracked assets
    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = assets::table.load::<AssetDB>(&mut conn)?;

        rows.into_iter().map(Asset::try_from).collect()
    }

    /// Deletes the asset when no holding references it any more.
    /// Returns whether a row was removed.
    fn delete_if_orphaned(&self, asset_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let references: i64 = holdings::table
            .filter(holdings::asset_id.eq(asset_id))
            .count()
            .get_result(&mut conn)?;

        if references > 0 {
            return Ok(false);
        }

        let deleted = diesel::delete(assets::table.find(asset_id)).execute(&mut conn)?;
        if deleted > 0 {
            debug!("Removed orphaned asset {}", asset_id);
        }
        Ok(deleted > 0)
    }
}
