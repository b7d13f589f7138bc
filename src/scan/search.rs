//! Thesis search
//!
//! Given a directional thesis (ticker, target price, target date,
//! optional stop-loss), walks the eligible expiries and ranks every
//! liquid contract by projected risk/reward.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::{DashError, DashResult, OptionKind, OptionRow};
use crate::data::MarketDataProvider;
use crate::pricing::{project, rank, select_expiries, RankedContract};

/// A directional trade thesis, as posted by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThesisQuery {
    pub ticker: String,
    pub target_price: f64,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub stop_loss: Option<f64>,
}

/// Ranked contracts matching a thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThesisResult {
    pub ticker: String,
    pub stock_price: f64,
    pub target_price: f64,
    pub target_date: NaiveDate,
    pub stop_loss: Option<f64>,
    /// Direction implied by the thesis: calls above spot, puts below.
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub expiries_considered: Vec<NaiveDate>,
    pub contracts: Vec<RankedContract>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Keep strikes plausibly in play for the move: a 500-strike call is
/// noise for a 100 -> 110 thesis.
fn in_strike_band(kind: OptionKind, strike: f64, spot: f64, target: f64) -> bool {
    match kind {
        OptionKind::Call => strike > 0.5 * spot && strike < 2.0 * target,
        OptionKind::Put => strike > 0.5 * target && strike < 2.0 * spot,
    }
}

fn is_liquid(row: &OptionRow) -> bool {
    row.volume >= 1 || row.open_interest >= 1
}

/// Find the best contracts for a thesis across the nearest expiries at
/// or after the target date.
pub fn find_best_options(
    provider: &dyn MarketDataProvider,
    query: &ThesisQuery,
    now: NaiveDateTime,
) -> DashResult<ThesisResult> {
    if query.target_price <= 0.0 {
        return Err(DashError::invalid_input("Target price must be positive"));
    }

    let quote = provider.stock_quote(&query.ticker)?;
    if quote.price <= 0.0 {
        return Err(DashError::missing(format!(
            "No tradeable price for {}",
            query.ticker
        )));
    }

    let kind = if query.target_price >= quote.price {
        OptionKind::Call
    } else {
        OptionKind::Put
    };

    let expiries = provider.expirations(&query.ticker)?;
    let selected = select_expiries(&expiries, query.target_date);
    if selected.is_empty() {
        return Err(DashError::missing(format!(
            "No expiries on or after {} for {}",
            query.target_date, query.ticker
        )));
    }

    let today = now.date();
    let days_to_target = (query.target_date - today).num_days() as f64;
    // +1: the move is assumed complete by end of the target day
    let t_target = (days_to_target + 1.0).max(0.5) / 365.0;

    let mut candidates = Vec::new();
    for &expiry in &selected {
        let chain = match provider.option_chain(&query.ticker, expiry) {
            Ok(chain) => chain,
            Err(err) => {
                tracing::warn!(ticker = %query.ticker, %expiry, error = %err, "chain fetch failed");
                continue;
            }
        };

        let days_to_expiry = (expiry - today).num_days();
        let t_expiry = (days_to_expiry as f64).max(0.5) / 365.0;
        let t_remaining = (t_expiry - t_target).max(0.001);

        for row in chain.side(kind) {
            if !is_liquid(row) || row.implied_volatility <= 0.0 {
                continue;
            }
            if !in_strike_band(kind, row.strike, quote.price, query.target_price) {
                continue;
            }
            let entry = row.entry_cost();
            if entry <= 0.0 {
                continue;
            }

            let proj = project(
                kind,
                entry,
                row.strike,
                row.implied_volatility,
                query.target_price,
                query.stop_loss,
                t_remaining,
            );

            candidates.push(RankedContract {
                kind,
                expiry,
                days_to_expiry,
                strike: row.strike,
                contract_symbol: row.contract_symbol.clone(),
                ask: entry,
                iv: round2(row.implied_volatility * 100.0),
                projected_reward: round2(proj.profit),
                projected_risk: proj.loss.map(|l| -round2(l)),
                risk_reward_ratio: proj.ratio,
                profit_pct: round1(proj.profit_pct),
            });
        }
    }

    Ok(ThesisResult {
        ticker: quote.symbol,
        stock_price: quote.price,
        target_price: query.target_price,
        target_date: query.target_date,
        stop_loss: query.stop_loss,
        kind,
        expiries_considered: selected,
        contracts: rank(candidates, query.stop_loss.is_some()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChainSnapshot, PriceHistory, StockQuote};
    use crate::data::HistoryRange;
    use chrono::Utc;

    struct ChainStub;

    impl ChainStub {
        fn row(kind: OptionKind, strike: f64, iv: f64, volume: u64, oi: u64) -> OptionRow {
            OptionRow {
                kind,
                strike,
                last_price: 1.00,
                bid: 0.95,
                ask: 1.05,
                volume,
                open_interest: oi,
                implied_volatility: iv,
                in_the_money: false,
                contract_symbol: format!("STUB{}{strike}", kind.as_str()),
            }
        }
    }

    impl MarketDataProvider for ChainStub {
        fn stock_quote(&self, symbol: &str) -> DashResult<StockQuote> {
            Ok(StockQuote {
                symbol: symbol.to_uppercase(),
                name: symbol.to_string(),
                price: 100.0,
                change: 0.0,
                change_percent: 0.0,
                previous_close: 100.0,
                day_high: 101.0,
                day_low: 99.0,
                volume: 1_000_000,
            })
        }

        fn expirations(&self, _symbol: &str) -> DashResult<Vec<NaiveDate>> {
            let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
            Ok(vec![d(6), d(13), d(20), d(27)])
        }

        fn option_chain(&self, symbol: &str, expiry: NaiveDate) -> DashResult<ChainSnapshot> {
            let mut chain = ChainSnapshot::new(symbol.to_uppercase(), expiry, 100.0);
            chain.calls = vec![
                Self::row(OptionKind::Call, 105.0, 0.35, 100, 500),
                // Illiquid: dropped
                Self::row(OptionKind::Call, 106.0, 0.35, 0, 0),
                // No IV: dropped
                Self::row(OptionKind::Call, 107.0, 0.0, 100, 500),
                // Far outside the band for a 110 target: dropped
                Self::row(OptionKind::Call, 250.0, 0.35, 100, 500),
            ];
            chain.puts = vec![Self::row(OptionKind::Put, 95.0, 0.35, 100, 500)];
            Ok(chain)
        }

        fn price_history(&self, symbol: &str, range: &HistoryRange) -> DashResult<PriceHistory> {
            Ok(PriceHistory {
                symbol: symbol.to_uppercase(),
                range: range.period.clone(),
                interval: range.interval.clone(),
                candles: vec![],
                fetched_at: Utc::now(),
            })
        }
    }

    fn wednesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn query(target: f64, stop: Option<f64>) -> ThesisQuery {
        ThesisQuery {
            ticker: "SPY".into(),
            target_price: target,
            target_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            stop_loss: stop,
        }
    }

    #[test]
    fn test_bullish_thesis_searches_calls() {
        let result = find_best_options(&ChainStub, &query(110.0, None), wednesday()).unwrap();
        assert_eq!(result.kind, OptionKind::Call);
        // Only the liquid, banded, IV-carrying strike survives, once per expiry
        assert_eq!(result.expiries_considered.len(), 3);
        assert_eq!(result.contracts.len(), 3);
        assert!(result.contracts.iter().all(|c| c.strike == 105.0));
        // Without a stop the risk fields stay empty
        assert!(result.contracts[0].risk_reward_ratio.is_none());
    }

    #[test]
    fn test_bearish_thesis_searches_puts() {
        let result = find_best_options(&ChainStub, &query(90.0, None), wednesday()).unwrap();
        assert_eq!(result.kind, OptionKind::Put);
        assert!(result.contracts.iter().all(|c| c.strike == 95.0));
    }

    #[test]
    fn test_stop_loss_populates_risk_and_sorts_by_ratio() {
        let result = find_best_options(&ChainStub, &query(110.0, Some(97.0)), wednesday()).unwrap();
        assert!(!result.contracts.is_empty());
        for c in &result.contracts {
            assert!(c.risk_reward_ratio.is_some());
            assert!(c.projected_risk.unwrap() <= 0.0);
        }
        for pair in result.contracts.windows(2) {
            assert!(pair[0].risk_reward_ratio.unwrap() >= pair[1].risk_reward_ratio.unwrap());
        }
    }

    #[test]
    fn test_rejects_bad_target() {
        let err = find_best_options(&ChainStub, &query(0.0, None), wednesday());
        assert!(matches!(err, Err(DashError::InvalidInput(_))));
    }

    #[test]
    fn test_no_eligible_expiries() {
        let mut q = query(110.0, None);
        q.target_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(find_best_options(&ChainStub, &q, wednesday()).is_err());
    }
}
