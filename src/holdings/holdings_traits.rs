use crate::assets::HoldingSpec;

use super::holdings_errors::Result;
use super::holdings_model::{Holding, HoldingWithAsset};

/// Trait defining the contract for Holding repository operations.
pub trait HoldingRepositoryTrait: Send + Sync {
    fn insert(&self, user_id: &str, asset_id: &str, spec: &HoldingSpec) -> Result<Holding>;
    fn list_for_user(&self, user_id: &str) -> Result<Vec<HoldingWithAsset>>;
    fn get_for_user(&self, holding_id: &str, user_id: &str) -> Result<HoldingWithAsset>;
    fn delete(&self, holding_id: &str, user_id: &str) -> Result<usize>;
}
