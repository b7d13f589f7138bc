//! Market data layer: provider trait, Yahoo client, caching, retry.

pub mod cache;
pub mod provider;
pub mod retry;
pub mod yahoo;

pub use cache::{CacheConfig, CachedProvider};
pub use provider::{HistoryRange, MarketDataProvider};
pub use retry::RetryPolicy;
pub use yahoo::YahooClient;
