pub mod history_calculator_tests;
pub mod portfolio_service_tests;
