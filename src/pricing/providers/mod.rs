pub(crate) mod price_provider;
pub(crate) mod random_walk_provider;

pub use price_provider::PriceProvider;
pub use random_walk_provider::RandomWalkProvider;
