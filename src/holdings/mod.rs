pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_service;
pub(crate) mod holdings_traits;

// Re-export the public interface
pub use holdings_model::{Holding, HoldingWithAsset};
pub use holdings_repository::HoldingRepository;
pub use holdings_service::HoldingService;
pub use holdings_traits::HoldingRepositoryTrait;

// Re-export error types for convenience
pub use holdings_errors::{HoldingError, Result};
