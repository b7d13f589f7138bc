//! Market-data provider boundary
//!
//! The typed interface the rest of the backend consumes. Implementations
//! must fail per symbol: one bad ticker is a recoverable error for the
//! caller, never a batch abort.

use chrono::NaiveDate;

use crate::core::{ChainSnapshot, DashResult, PriceHistory, StockQuote};

/// Upstream quote/chain/history source.
pub trait MarketDataProvider: Send + Sync {
    /// Current quote with session high/low.
    fn stock_quote(&self, symbol: &str) -> DashResult<StockQuote>;

    /// Available option expiries, in provider-listing order.
    fn expirations(&self, symbol: &str) -> DashResult<Vec<NaiveDate>>;

    /// Full chain (calls and puts) for one expiry.
    fn option_chain(&self, symbol: &str, expiry: NaiveDate) -> DashResult<ChainSnapshot>;

    /// OHLCV candles for the charting endpoint.
    fn price_history(&self, symbol: &str, range: &HistoryRange) -> DashResult<PriceHistory>;
}

/// Period/interval pair for a history request.
#[derive(Debug, Clone)]
pub struct HistoryRange {
    /// Lookback window: 1d, 5d, 1mo, 3mo.
    pub period: String,
    /// Bar size: 1m, 5m, 15m, 1h, 1d.
    pub interval: String,
}

impl Default for HistoryRange {
    fn default() -> Self {
        Self {
            period: "5d".to_string(),
            interval: "1m".to_string(),
        }
    }
}

impl HistoryRange {
    pub fn new(period: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            interval: interval.into(),
        }
    }
}
