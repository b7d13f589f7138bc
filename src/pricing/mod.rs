//! Pricing and scoring engine
//!
//! Pure, stateless numerical core:
//! - Black-Scholes price and Greeks
//! - Time-to-expiry models (calendar and trading-hours)
//! - Scalp score heuristic
//! - Risk/reward projection
//! - Chain enrichment
//!
//! Nothing in here performs I/O, caches, or holds global state; every
//! value is recomputed per request from the inputs it is handed.

pub mod black_scholes;
pub mod enrich;
pub mod projector;
pub mod scalp;
pub mod time;

pub use black_scholes::{greeks, norm_cdf, norm_pdf, price, RISK_FREE_RATE};
pub use enrich::enrich_chain;
pub use projector::{
    project, rank, select_expiries, RankedContract, RiskRewardProjection, MAX_EXPIRIES,
    MAX_RESULTS, MIN_LOSS, RATIO_SENTINEL,
};
pub use scalp::scalp_score;
pub use time::{calendar_years, TradingCalendar};
