use super::assets_errors::Result;
use super::assets_model::{Asset, NewAsset};

/// Trait defining the contract for Asset repository operations.
pub trait AssetRepositoryTrait: Send + Sync {
    fn find_or_create(&self, new_asset: NewAsset) -> Result<Asset>;
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
    fn delete_if_orphaned(&self, asset_id: &str) -> Result<bool>;
}
