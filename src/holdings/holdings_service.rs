use log::{debug, error};
use std::sync::Arc;

use crate::assets::{AssetRepositoryTrait, CreateHoldingRequest, NewAsset};

use super::holdings_errors::{HoldingError, Result};
use super::holdings_model::{Holding, HoldingWithAsset};
use super::holdings_traits::HoldingRepositoryTrait;

/// Service for managing portfolio membership.
///
/// Creation validates the class invariants, dedups the asset by its natural
/// key and links the user to it; removal cleans up assets left without any
/// holder.
pub struct HoldingService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
}

impl HoldingService {
    /// Creates a new HoldingService instance
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
    ) -> Self {
        Self {
            holding_repository,
            asset_repository,
        }
    }

    /// Adds an asset to the user's portfolio.
    ///
    /// Creating the same (contract_address, chain, kind) twice reuses the
    /// existing asset row; the holding row is always new, so repeated adds
    /// represent separate lots.
    pub fn create_holding(&self, user_id: &str, request: &CreateHoldingRequest) -> Result<Holding> {
        let spec = request.validate()?;
        let asset = self
            .asset_repository
            .find_or_create(NewAsset::from_request(request, &spec))?;

        let holding = self
            .holding_repository
            .insert(user_id, &asset.id, &spec)
            .map_err(|e| {
                error!("Failed to create holding for user {}: {}", user_id, e);
                e
            })?;

        debug!(
            "Created holding {} for user {} on asset {}",
            holding.id, user_id, asset.id
        );
        Ok(holding)
    }

    /// Lists all holdings in the user's portfolio
    pub fn list_holdings(&self, user_id: &str) -> Result<Vec<HoldingWithAsset>> {
        self.holding_repository.list_for_user(user_id)
    }

    /// Retrieves a single holding owned by the user
    pub fn get_holding(&self, holding_id: &str, user_id: &str) -> Result<HoldingWithAsset> {
        self.holding_repository.get_for_user(holding_id, user_id)
    }

    /// Removes a holding from the user's portfolio and deletes the asset if
    /// this was its last holder.
    pub fn delete_holding(&self, holding_id: &str, user_id: &str) -> Result<()> {
        let holding = self.holding_repository.get_for_user(holding_id, user_id)?;

        let deleted = self.holding_repository.delete(holding_id, user_id)?;
        if deleted == 0 {
            return Err(HoldingError::NotFound(format!(
                "Holding {} not found in user's portfolio",
                holding_id
            )));
        }

        if self.asset_repository.delete_if_orphaned(&holding.asset_id)? {
            debug!(
                "Asset {} removed after losing its last holding",
                holding.asset_id
            );
        }

        Ok(())
    }
}
