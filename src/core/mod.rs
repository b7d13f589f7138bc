//! Core data types for the analytics backend
//!
//! Defines fundamental types:
//! - OptionKind / OptionRow: raw chain rows from the provider
//! - EnrichedOption: per-contract record with Greeks and scores
//! - StockQuote / ChainSnapshot / CandleBar: upstream snapshots
//! - Greeks: computed sensitivities
//! - DashError: error taxonomy

pub mod error;
pub mod greeks;
pub mod option;
pub mod quote;

pub use error::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
