use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::assets::{Asset, AssetKind, HoldingSpec};

use super::holdings_errors::{HoldingError, Result};

/// Domain model representing a user's ownership of an asset.
///
/// One user may hold the same asset through several rows; each row is a
/// separate lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub user_id: String,
    pub asset_id: String,
    pub quantity: Option<Decimal>,
    pub created_at: NaiveDateTime,
}

/// A holding merged with its asset's metadata, the shape consumed by the
/// portfolio read paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingWithAsset {
    pub id: String,
    pub user_id: String,
    pub asset_id: String,
    pub quantity: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub name: String,
    pub asset_kind: AssetKind,
    pub description: Option<String>,
    pub contract_address: String,
    pub chain: String,
    pub token_id: Option<String>,
    pub asset_created_at: NaiveDateTime,
}

impl HoldingWithAsset {
    pub fn from_parts(holding: Holding, asset: Asset) -> Self {
        Self {
            id: holding.id,
            user_id: holding.user_id,
            asset_id: holding.asset_id,
            quantity: holding.quantity,
            created_at: holding.created_at,
            name: asset.name,
            asset_kind: asset.asset_kind,
            description: asset.description,
            contract_address: asset.contract_address,
            chain: asset.chain,
            token_id: asset.token_id,
            asset_created_at: asset.created_at,
        }
    }

    /// Quantity entering every valuation: the stored quantity for fungible
    /// holdings, exactly one for unique holdings.
    ///
    /// A fungible holding with no stored quantity is corrupt data and
    /// surfaces as an error before any computation runs.
    pub fn effective_quantity(&self) -> Result<Decimal> {
        match (self.asset_kind, self.quantity) {
            (AssetKind::Fungible, Some(quantity)) => Ok(quantity),
            (AssetKind::Fungible, None) => Err(HoldingError::InvalidData(format!(
                "Fungible holding {} has no stored quantity",
                self.id
            ))),
            (AssetKind::Unique, _) => Ok(Decimal::ONE),
        }
    }
}

/// Database model for holdings
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub user_id: String,
    pub asset_id: String,
    pub quantity: Option<String>,
    pub created_at: NaiveDateTime,
}

impl HoldingDB {
    pub fn build(user_id: &str, asset_id: &str, spec: &HoldingSpec) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            asset_id: asset_id.to_string(),
            quantity: spec.stored_quantity().map(|q| q.to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

// Conversion implementations
impl TryFrom<HoldingDB> for Holding {
    type Error = HoldingError;

    fn try_from(db: HoldingDB) -> Result<Self> {
        let quantity = db
            .quantity
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| {
                HoldingError::InvalidData(format!(
                    "Holding {} has an unparsable quantity: {}",
                    db.id, e
                ))
            })?;

        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            asset_id: db.asset_id,
            quantity,
            created_at: db.created_at,
        })
    }
}
