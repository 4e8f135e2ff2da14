pub(crate) mod pricing_errors;
pub(crate) mod pricing_model;
pub(crate) mod pricing_repository;
pub(crate) mod pricing_service;
pub(crate) mod pricing_traits;
pub mod providers;

// Re-export the public interface
pub use pricing_model::{IngestionReport, PricePoint, PRICE_SCALE};
pub use pricing_repository::PriceRepository;
pub use pricing_service::PriceIngestionService;
pub use pricing_traits::PriceRepositoryTrait;
pub use providers::{PriceProvider, RandomWalkProvider};

// Re-export error types for convenience
pub use pricing_errors::{PriceError, Result};
