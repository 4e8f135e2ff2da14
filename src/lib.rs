pub mod db;

pub mod assets;
pub mod holdings;
pub mod pricing;

pub mod errors;
pub mod portfolio;
pub mod schema;

pub use errors::{Error, Result};
