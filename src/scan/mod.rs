//! Market scanner
//!
//! Fans out over a ticker universe on a fixed worker pool, enriches the
//! nearest chain per ticker and surfaces the most scalpable contracts
//! market-wide. One bad ticker is recorded as an error string; the scan
//! always completes.

pub mod search;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{DashError, DashResult, EnrichedOption};
use crate::data::MarketDataProvider;
use crate::pricing::{enrich_chain, TradingCalendar};

pub use search::{find_best_options, ThesisQuery, ThesisResult};

/// Scanner knobs. Worker count is fixed per scan, not global.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Parallel tickers in flight.
    pub workers: usize,
    /// Contracts kept per side per ticker before the market-wide merge.
    pub per_stock: usize,
    /// Contracts kept per side in the final report.
    pub max_results: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            per_stock: 5,
            max_results: 50,
        }
    }
}

/// Most-traded contracts of one ticker's nearest expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVolumeReport {
    pub symbol: String,
    pub stock_price: f64,
    pub expiry: NaiveDate,
    pub calls: Vec<EnrichedOption>,
    pub puts: Vec<EnrichedOption>,
}

/// One contract in a market-wide scan, tagged with its underlying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedOption {
    pub ticker: String,
    pub stock_price: f64,
    pub expiry: NaiveDate,
    #[serde(flatten)]
    pub option: EnrichedOption,
}

/// Full market scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketScan {
    pub calls: Vec<ScannedOption>,
    pub puts: Vec<ScannedOption>,
    pub scanned: Vec<String>,
    pub errors: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Pick the expiry closest to tomorrow among the first few listed.
///
/// Scalping wants the shortest-dated liquid chain, but a same-day expiry
/// in its final minutes is already dead; "nearest to tomorrow" lands on
/// the front chain without that trap.
fn nearest_expiry(expiries: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    let target = today + Duration::days(1);
    expiries
        .iter()
        .take(5)
        .copied()
        // Ties go to the later side of the target
        .min_by_key(|e| ((*e - target).num_days().abs(), *e < target))
}

fn top_by_volume(mut rows: Vec<EnrichedOption>, n: usize) -> Vec<EnrichedOption> {
    rows.sort_by(|a, b| b.volume.cmp(&a.volume));
    rows.truncate(n);
    rows
}

/// Most-traded contracts for one ticker.
pub fn top_volume_options(
    provider: &dyn MarketDataProvider,
    calendar: &TradingCalendar,
    ticker: &str,
    top_n: usize,
    now: NaiveDateTime,
) -> DashResult<TopVolumeReport> {
    let quote = provider.stock_quote(ticker)?;
    let expiries = provider.expirations(ticker)?;
    let expiry = nearest_expiry(&expiries, now.date())
        .ok_or_else(|| DashError::missing(format!("No expiries listed for {ticker}")))?;

    let chain = provider.option_chain(ticker, expiry)?;
    let spot = if chain.stock_price > 0.0 {
        chain.stock_price
    } else {
        quote.price
    };

    let calls = enrich_chain(
        &chain.calls,
        spot,
        quote.day_high,
        quote.day_low,
        expiry,
        calendar,
        now,
    );
    let puts = enrich_chain(
        &chain.puts,
        spot,
        quote.day_high,
        quote.day_low,
        expiry,
        calendar,
        now,
    );

    Ok(TopVolumeReport {
        symbol: quote.symbol,
        stock_price: spot,
        expiry,
        calls: top_by_volume(calls, top_n),
        puts: top_by_volume(puts, top_n),
    })
}

/// Scan a ticker universe and rank every side by (scalp score, volume).
pub fn scan_market(
    provider: &dyn MarketDataProvider,
    calendar: &TradingCalendar,
    tickers: &[String],
    config: &ScanConfig,
    now: NaiveDateTime,
) -> MarketScan {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build();

    let outcomes: Vec<(String, DashResult<TopVolumeReport>)> = match pool {
        Ok(pool) => pool.install(|| {
            tickers
                .par_iter()
                .map(|t| {
                    (
                        t.clone(),
                        top_volume_options(provider, calendar, t, config.per_stock, now),
                    )
                })
                .collect()
        }),
        // Pool creation failing leaves the global pool; same semantics.
        Err(_) => tickers
            .par_iter()
            .map(|t| {
                (
                    t.clone(),
                    top_volume_options(provider, calendar, t, config.per_stock, now),
                )
            })
            .collect(),
    };

    let mut calls = Vec::new();
    let mut puts = Vec::new();
    let mut scanned = Vec::new();
    let mut errors = Vec::new();

    for (ticker, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                calls.extend(tag(&report, report.calls.clone()));
                puts.extend(tag(&report, report.puts.clone()));
                scanned.push(ticker);
            }
            Err(err) => {
                tracing::warn!(ticker = %ticker, error = %err, "scan skipped ticker");
                errors.push(format!("{ticker}: {err}"));
            }
        }
    }

    sort_scanned(&mut calls);
    sort_scanned(&mut puts);
    calls.truncate(config.max_results);
    puts.truncate(config.max_results);

    MarketScan {
        calls,
        puts,
        scanned,
        errors,
        generated_at: Utc::now(),
    }
}

fn tag(report: &TopVolumeReport, rows: Vec<EnrichedOption>) -> Vec<ScannedOption> {
    rows.into_iter()
        .map(|option| ScannedOption {
            ticker: report.symbol.clone(),
            stock_price: report.stock_price,
            expiry: report.expiry,
            option,
        })
        .collect()
}

fn sort_scanned(rows: &mut [ScannedOption]) {
    rows.sort_by(|a, b| {
        b.option
            .scalp_score
            .total_cmp(&a.option.scalp_score)
            .then(b.option.volume.cmp(&a.option.volume))
    });
}
