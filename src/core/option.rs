//! Option contract types
//!
//! Typed records for chain rows as they enter the core from a market-data
//! provider, and the enriched per-contract record the API serves back out.

use serde::{Deserialize, Serialize};

use super::greeks::Greeks;

/// Option kind (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Intrinsic value at the given stock price.
    pub fn intrinsic(&self, stock_price: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (stock_price - strike).max(0.0),
            OptionKind::Put => (strike - stock_price).max(0.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Call => "CALL",
            OptionKind::Put => "PUT",
        }
    }
}

/// One raw row of an options chain, as provided upstream.
///
/// Prices may legitimately be zero (no bid, never traded) and implied
/// volatility may be zero or absent; the pricing layer degrades those rows
/// instead of rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRow {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub strike: f64,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: u64,
    pub open_interest: u64,
    /// Implied volatility as a decimal fraction (0.35 = 35%).
    pub implied_volatility: f64,
    pub in_the_money: bool,
    pub contract_symbol: String,
}

impl OptionRow {
    /// Mid price when both sides are quoted, otherwise the last trade.
    pub fn mid_price(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 {
            (self.bid + self.ask) / 2.0
        } else {
            self.last_price
        }
    }

    /// Entry cost for a buyer: the ask when quoted, else the last trade.
    pub fn entry_cost(&self) -> f64 {
        if self.ask > 0.0 {
            self.ask
        } else {
            self.last_price
        }
    }

    /// Bid-ask spread, zero unless both sides are quoted.
    pub fn spread(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 {
            self.ask - self.bid
        } else {
            0.0
        }
    }
}

/// Enriched per-contract record served by the top-volume and scan
/// endpoints: the raw fields plus computed Greeks and trade-quality
/// metrics. Pure computed value, rebuilt on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub strike: f64,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub spread: f64,
    pub spread_pct: f64,
    pub volume: u64,
    pub open_interest: u64,
    /// Implied volatility in percent, for display.
    pub implied_volatility: f64,
    pub in_the_money: bool,
    pub contract_symbol: String,
    #[serde(flatten)]
    pub greeks: Greeks,
    pub vol_oi_ratio: f64,
    pub scalp_score: f64,
    /// Projected per-contract profit if the stock reverts to the session
    /// high (calls) or low (puts).
    pub reversal_profit: f64,
    pub reversal_pct: f64,
}
