use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::assets::AssetError;

/// Custom error type for price-store and ingestion operations
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Duplicate price point: {0}")]
    DuplicatePricePoint(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Price provider error: {0}")]
    ProviderError(String),
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl From<DieselError> for PriceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                PriceError::DuplicatePricePoint(info.message().to_string())
            }
            _ => PriceError::DatabaseError(err.to_string()),
        }
    }
}

impl From<crate::errors::Error> for PriceError {
    fn from(err: crate::errors::Error) -> Self {
        PriceError::DatabaseError(err.to_string())
    }
}

/// Result type for price operations
pub type Result<T> = std::result::Result<T, PriceError>;
