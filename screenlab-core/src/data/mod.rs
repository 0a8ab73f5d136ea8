//! Provider boundary: fetch contracts, Yahoo Finance client, normalization,
//! response cache.

pub mod cache;
pub mod circuit_breaker;
pub mod normalize;
pub mod provider;
pub mod yahoo;

pub use cache::ResponseCache;
pub use circuit_breaker::CircuitBreaker;
pub use normalize::{normalize_history, NormalizeReport};
pub use provider::{FetchError, MarketDataProvider};
pub use yahoo::YahooProvider;
