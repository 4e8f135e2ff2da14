use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assets_errors::{AssetError, Result};

/// The two classes of on-chain instruments tracked by the core.
///
/// Fungible assets are interchangeable balances tracked by quantity; unique
/// assets are one-of-a-kind instances identified by a token ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Fungible,
    Unique,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Fungible => "FUNGIBLE",
            AssetKind::Unique => "UNIQUE",
        }
    }
}

impl TryFrom<&str> for AssetKind {
    type Error = AssetError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "FUNGIBLE" => Ok(AssetKind::Fungible),
            "UNIQUE" => Ok(AssetKind::Unique),
            other => Err(AssetError::InvalidData(format!(
                "Unknown asset kind '{}'",
                other
            ))),
        }
    }
}

/// Validated field combination for a new holding.
///
/// The optional token-ID/quantity pair collapses into a tagged variant so the
/// class invariants are checked once, at the edge, and the rest of the core
/// can match exhaustively instead of re-probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldingSpec {
    Fungible { quantity: Decimal },
    Unique { token_id: String },
}

impl HoldingSpec {
    /// Quantity as persisted on the holding row. Unique holdings store none;
    /// their effective quantity of one is derived on the read side.
    pub fn stored_quantity(&self) -> Option<Decimal> {
        match self {
            HoldingSpec::Fungible { quantity } => Some(*quantity),
            HoldingSpec::Unique { .. } => None,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            HoldingSpec::Fungible { .. } => AssetKind::Fungible,
            HoldingSpec::Unique { .. } => AssetKind::Unique,
        }
    }

    pub fn token_id(&self) -> Option<&str> {
        match self {
            HoldingSpec::Fungible { .. } => None,
            HoldingSpec::Unique { token_id } => Some(token_id.as_str()),
        }
    }
}

/// Input model for adding an asset to a user's portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHoldingRequest {
    pub name: String,
    pub asset_kind: AssetKind,
    pub description: Option<String>,
    pub contract_address: String,
    pub chain: String,
    pub token_id: Option<String>,
    pub quantity: Option<Decimal>,
}

impl CreateHoldingRequest {
    /// Validates the class-dependent fields and produces the tagged spec.
    ///
    /// Deterministic and side-effect free: the same request always yields the
    /// same accept/reject decision.
    pub fn validate(&self) -> Result<HoldingSpec> {
        if self.name.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Asset name cannot be empty".to_string(),
            ));
        }
        if self.contract_address.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Contract address cannot be empty".to_string(),
            ));
        }
        if self.chain.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Chain cannot be empty".to_string(),
            ));
        }

        match (self.asset_kind, &self.token_id, self.quantity) {
            (AssetKind::Unique, Some(token_id), None) => Ok(HoldingSpec::Unique {
                token_id: token_id.clone(),
            }),
            (AssetKind::Unique, None, _) => Err(AssetError::InvalidData(
                "A token ID is required for unique assets".to_string(),
            )),
            (AssetKind::Unique, Some(_), Some(_)) => Err(AssetError::InvalidData(
                "A quantity must not be provided for unique assets".to_string(),
            )),
            (AssetKind::Fungible, Some(_), _) => Err(AssetError::InvalidData(
                "A token ID must not be provided for fungible assets".to_string(),
            )),
            (AssetKind::Fungible, None, Some(quantity)) if quantity > Decimal::ZERO => {
                Ok(HoldingSpec::Fungible { quantity })
            }
            (AssetKind::Fungible, None, _) => Err(AssetError::InvalidData(
                "A positive quantity is required for fungible assets".to_string(),
            )),
        }
    }
}

/// Domain model representing an asset in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_kind: AssetKind,
    pub description: Option<String>,
    pub contract_address: String,
    pub chain: String,
    pub token_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new asset
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub asset_kind: AssetKind,
    pub description: Option<String>,
    pub contract_address: String,
    pub chain: String,
    pub token_id: Option<String>,
}

impl NewAsset {
    /// Builds the global asset record for a validated holding request.
    pub fn from_request(request: &CreateHoldingRequest, spec: &HoldingSpec) -> Self {
        Self {
            name: request.name.clone(),
            asset_kind: spec.kind(),
            description: request.description.clone(),
            contract_address: request.contract_address.clone(),
            chain: request.chain.clone(),
            token_id: spec.token_id().map(str::to_string),
        }
    }
}

/// Database model for assets
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub name: String,
    pub asset_kind: String,
    pub description: Option<String>,
    pub contract_address: String,
    pub chain: String,
    pub token_id: Option<String>,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl TryFrom<AssetDB> for Asset {
    type Error = AssetError;

    fn try_from(db: AssetDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            name: db.name,
            asset_kind: AssetKind::try_from(db.asset_kind.as_str())?,
            description: db.description,
            contract_address: db.contract_address,
            chain: db.chain,
            token_id: db.token_id,
            created_at: db.created_at,
        })
    }
}

impl From<NewAsset> for AssetDB {
    fn from(domain: NewAsset) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            name: domain.name,
            asset_kind: domain.asset_kind.as_str().to_string(),
            description: domain.description,
            contract_address: domain.contract_address,
            chain: domain.chain,
            token_id: domain.token_id,
            created_at: now,
        }
    }
}
