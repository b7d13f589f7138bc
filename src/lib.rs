//! # optiondash - Options Trading Analytics Backend
//!
//! Analytics backend for an intraday options dashboard: Black-Scholes
//! Greeks, scalp scoring and risk/reward projection computed on demand
//! over live option chains.
//!
//! ## Key Components
//!
//! - **Pricing**: Black-Scholes price/Greeks, calendar and trading-hours
//!   time models, scalp score, risk/reward projector, chain enrichment
//! - **Data**: Yahoo Finance client behind a provider trait, with a
//!   short-TTL cache and bounded retry
//! - **Scanner**: parallel market scan and thesis search over a watched
//!   ticker universe
//! - **Store**: sqlite-backed ticker and option watchlists
//! - **API**: thin axum layer serving the dashboard frontend
//!
//! ## Usage
//!
//! ```rust
//! use optiondash::prelude::*;
//!
//! // Price an at-the-money call with a week to expiry
//! let call = bs_price(OptionKind::Call, 100.0, 100.0, 7.0 / 365.0, 0.25, RISK_FREE_RATE);
//! let g = bs_greeks(OptionKind::Call, 100.0, 100.0, 7.0 / 365.0, 0.25);
//! assert!(call > 0.0 && g.delta > 0.0);
//! ```
//!
//! ## What This System Does NOT Do
//!
//! - American early exercise (European approximation throughout)
//! - Dividend yields or IV calibration
//! - Predict prices; every score is a ranking heuristic, not a signal

pub mod api;
pub mod core;
pub mod data;
pub mod pricing;
pub mod scan;
pub mod store;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ChainSnapshot, DashError, DashResult, EnrichedOption, Greeks, OptionKind, OptionRow,
        PriceHistory, StockQuote,
    };

    // Pricing
    pub use crate::pricing::{
        calendar_years, enrich_chain, greeks as bs_greeks, norm_cdf, norm_pdf, price as bs_price,
        project, scalp_score, RiskRewardProjection, TradingCalendar, RISK_FREE_RATE,
    };

    // Data
    pub use crate::data::{
        CacheConfig, CachedProvider, HistoryRange, MarketDataProvider, RetryPolicy, YahooClient,
    };

    // Scanner
    pub use crate::scan::{
        find_best_options, scan_market, top_volume_options, MarketScan, ScanConfig, ThesisQuery,
        ThesisResult, TopVolumeReport,
    };

    // Store
    pub use crate::store::{WatchedOption, WatchedTicker, WatchlistStore};
}

// Re-export main types at crate root
pub use crate::core::{DashError, DashResult};
pub use crate::pricing::TradingCalendar;
