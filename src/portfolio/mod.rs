pub mod history_calculator;
pub mod portfolio_errors;
pub mod portfolio_model;
pub mod portfolio_service;

#[cfg(test)]
pub(crate) mod tests;

pub use history_calculator::calculate_history;
pub use portfolio_errors::{PortfolioError, Result};
pub use portfolio_model::{AssetHistory, HistoryEntry, PortfolioSummary};
pub use portfolio_service::PortfolioService;
