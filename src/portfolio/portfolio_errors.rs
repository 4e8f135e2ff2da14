use thiserror::Error;

use crate::holdings::HoldingError;
use crate::pricing::PriceError;

/// Custom error type for portfolio read paths
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// The first price of a series is zero or negative; PnL percentages
    /// cannot be derived from it.
    #[error("Degenerate price series: {0}")]
    DegenerateSeries(String),
    /// Any failure while aggregating a user's portfolio. No partial result
    /// is ever returned alongside this.
    #[error("Portfolio aggregation failed: {0}")]
    Aggregation(String),
    #[error("Holding error: {0}")]
    Holding(#[from] HoldingError),
    #[error("Price error: {0}")]
    Price(#[from] PriceError),
}

/// Result type for portfolio operations
pub type Result<T> = std::result::Result<T, PortfolioError>;
