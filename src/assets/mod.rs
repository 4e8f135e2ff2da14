pub(crate) mod assets_errors;
pub(crate) mod assets_model;
pub(crate) mod assets_repository;
pub(crate) mod assets_traits;

// Re-export the public interface
pub use assets_model::{Asset, AssetKind, CreateHoldingRequest, HoldingSpec, NewAsset};
pub use assets_repository::AssetRepository;
pub use assets_traits::AssetRepositoryTrait;

// Re-export error types for convenience
pub use assets_errors::{AssetError, Result};
