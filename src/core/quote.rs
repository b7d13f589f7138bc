//! Upstream market data records
//!
//! Typed snapshots returned by a market-data provider: stock quotes,
//! per-expiry chains and price-history candles. These are the only shapes
//! the core consumes; validation happens where provider JSON is parsed,
//! not inside the pricing math.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::option::OptionRow;

/// Current stock quote with the session range the enrichment needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub previous_close: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
}

/// Options chain for one expiry: calls and puts with raw market fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub symbol: String,
    pub expiry: NaiveDate,
    /// Underlying price at fetch time.
    pub stock_price: f64,
    pub calls: Vec<OptionRow>,
    pub puts: Vec<OptionRow>,
}

impl ChainSnapshot {
    pub fn new(symbol: impl Into<String>, expiry: NaiveDate, stock_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            expiry,
            stock_price,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Rows for one side of the chain.
    pub fn side(&self, kind: super::option::OptionKind) -> &[OptionRow] {
        match kind {
            super::option::OptionKind::Call => &self.calls,
            super::option::OptionKind::Put => &self.puts,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.calls.len() + self.puts.len()
    }
}

/// One OHLCV bar of price history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleBar {
    /// Unix timestamp (seconds).
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history response for the charting endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub symbol: String,
    pub range: String,
    pub interval: String,
    pub candles: Vec<CandleBar>,
    pub fetched_at: DateTime<Utc>,
}
