//! Risk/reward projector
//!
//! Projects an option's theoretical price at a future date under a
//! hypothesized stock price (a trade thesis: target, optional stop-loss,
//! target date) and derives profit, loss and a risk/reward ratio.
//!
//! Known discrepancy, documented rather than patched: the projection
//! feeds an independently-sourced IV into the theoretical pricer and
//! compares the result against a real market premium. When the supplied
//! IV is overstated relative to the market-implied value, the
//! theoretical price at the stop-loss scenario can exceed the premium
//! actually paid, and the projector reports a gain for a scenario that
//! is strictly worse for the position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::black_scholes::{price, RISK_FREE_RATE};
use crate::core::OptionKind;

/// Ratio reported when even the stop-loss scenario is profitable.
pub const RATIO_SENTINEL: f64 = 999.9;

/// Floor applied to a positive loss before dividing.
pub const MIN_LOSS: f64 = 0.01;

/// At most this many ranked contracts are returned by a thesis search.
pub const MAX_RESULTS: usize = 20;

/// Eligible expiries per search: the first few on or after the target.
pub const MAX_EXPIRIES: usize = 4;

/// Outcome of projecting one contract under a thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRewardProjection {
    /// Theoretical price at the target date if the stock hits the target.
    pub reward_price: f64,
    /// Theoretical price at the target date if the stock hits the stop.
    pub risk_price: Option<f64>,
    /// Reward price minus entry cost.
    pub profit: f64,
    /// Entry cost minus risk price, floored at 0.01. Only with a stop.
    pub loss: Option<f64>,
    /// profit / loss (2dp), 999.9 when risk is non-positive, 0.0 when
    /// profit is non-positive. Only with a stop.
    pub ratio: Option<f64>,
    /// Profit as a percentage of the entry cost.
    pub profit_pct: f64,
}

/// Project a single contract. Pure; `time_remaining_at_target` is the
/// year fraction left on the option at the target date and must already
/// be floored to a positive epsilon by the caller.
pub fn project(
    kind: OptionKind,
    entry_cost: f64,
    strike: f64,
    iv: f64,
    target_price: f64,
    stop_loss: Option<f64>,
    time_remaining_at_target: f64,
) -> RiskRewardProjection {
    let reward_price = price(
        kind,
        target_price,
        strike,
        time_remaining_at_target,
        iv,
        RISK_FREE_RATE,
    );
    let profit = reward_price - entry_cost;
    let profit_pct = if entry_cost > 0.0 {
        profit / entry_cost * 100.0
    } else {
        0.0
    };

    let (risk_price, loss, ratio) = match stop_loss {
        Some(stop) => {
            let risk_price = price(
                kind,
                stop,
                strike,
                time_remaining_at_target,
                iv,
                RISK_FREE_RATE,
            );
            let raw_loss = entry_cost - risk_price;
            let loss = raw_loss.max(MIN_LOSS);
            let ratio = if raw_loss <= 0.0 {
                // Even the stop-loss scenario pays off
                RATIO_SENTINEL
            } else if profit <= 0.0 {
                0.0
            } else {
                ((profit / loss) * 100.0).round() / 100.0
            };
            (Some(risk_price), Some(loss), Some(ratio))
        }
        None => (None, None, None),
    };

    RiskRewardProjection {
        reward_price,
        risk_price,
        profit,
        loss,
        ratio,
        profit_pct,
    }
}

/// One ranked contract in a thesis-search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContract {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    pub strike: f64,
    pub contract_symbol: String,
    /// Entry cost (ask, or last trade when no ask).
    pub ask: f64,
    pub iv: f64,
    /// Projected profit at the target scenario.
    pub projected_reward: f64,
    /// Projected loss at the stop scenario, displayed as a negative.
    pub projected_risk: Option<f64>,
    pub risk_reward_ratio: Option<f64>,
    pub profit_pct: f64,
}

/// Expiries eligible for a thesis: on or after the target date, first
/// `MAX_EXPIRIES` in provider-listing order. An expiry before the target
/// cannot be evaluated at the target date and is excluded.
pub fn select_expiries(expiries: &[NaiveDate], target: NaiveDate) -> Vec<NaiveDate> {
    expiries
        .iter()
        .copied()
        .filter(|e| *e >= target)
        .take(MAX_EXPIRIES)
        .collect()
}

/// Sort candidates best-first and keep the top `MAX_RESULTS`.
///
/// With a stop-loss the sort key is the risk/reward ratio; without one
/// it is the profit percentage. Sort order is part of the contract.
pub fn rank(mut results: Vec<RankedContract>, has_stop: bool) -> Vec<RankedContract> {
    results.sort_by(|a, b| {
        let ka = sort_key(a, has_stop);
        let kb = sort_key(b, has_stop);
        kb.total_cmp(&ka)
    });
    results.truncate(MAX_RESULTS);
    results
}

fn sort_key(c: &RankedContract, has_stop: bool) -> f64 {
    if has_stop {
        c.risk_reward_ratio.unwrap_or(0.0)
    } else {
        c.profit_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionKind::{Call, Put};

    #[test]
    fn test_sentinel_when_stop_scenario_profitable() {
        // Stop above strike on a call: projected risk price stays above
        // a tiny entry cost, so raw loss <= 0
        let p = project(Call, 0.05, 100.0, 0.40, 112.0, Some(108.0), 5.0 / 365.0);
        assert_eq!(p.ratio, Some(RATIO_SENTINEL));
        // Loss still reported at the floor
        assert_eq!(p.loss, Some(MIN_LOSS));
    }

    #[test]
    fn test_zero_ratio_when_profit_non_positive() {
        // Target below strike near expiry: reward price is floored at
        // 0.01, far below the entry cost
        let p = project(Call, 2.00, 100.0, 0.25, 90.0, Some(85.0), 1.0 / 365.0);
        assert!(p.profit <= 0.0);
        assert_eq!(p.ratio, Some(0.0));
    }

    #[test]
    fn test_ratio_matches_recomputation() {
        // Thesis: stock at 100, target 110, stop 95, strike-100 call,
        // IV 25%, two trading-ish days left on the option at the target
        let t_rem = 2.0 / 365.0;
        let entry = 2.00;
        let p = project(Call, entry, 100.0, 0.25, 110.0, Some(95.0), t_rem);

        let reward = price(Call, 110.0, 100.0, t_rem, 0.25, RISK_FREE_RATE);
        let risk = price(Call, 95.0, 100.0, t_rem, 0.25, RISK_FREE_RATE);
        let profit = reward - entry;
        let loss = (entry - risk).max(MIN_LOSS);
        let expected = ((profit / loss) * 100.0).round() / 100.0;

        assert!(p.profit > 0.0);
        assert!(p.loss.unwrap() >= MIN_LOSS);
        assert_eq!(p.ratio, Some(expected));
    }

    #[test]
    fn test_no_stop_loss_fields() {
        let p = project(Put, 1.50, 100.0, 0.30, 95.0, None, 10.0 / 365.0);
        assert!(p.risk_price.is_none());
        assert!(p.loss.is_none());
        assert!(p.ratio.is_none());
        assert!(p.profit > 0.0);
        assert!((p.profit_pct - p.profit / 1.50 * 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_expiries_filters_and_caps() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
        let expiries = vec![d(1), d(3), d(7), d(10), d(14), d(21)];
        let selected = select_expiries(&expiries, d(5));
        assert_eq!(selected, vec![d(7), d(10), d(14), d(21)]);

        // Listing order is preserved, not re-sorted
        let shuffled = vec![d(14), d(7), d(1), d(10)];
        assert_eq!(select_expiries(&shuffled, d(5)), vec![d(14), d(7), d(10)]);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let mk = |ratio: f64, pct: f64| RankedContract {
            kind: Call,
            expiry: NaiveDate::from_ymd_opt(2025, 7, 18).unwrap(),
            days_to_expiry: 5,
            strike: 100.0,
            contract_symbol: format!("X{ratio}"),
            ask: 1.0,
            iv: 0.3,
            projected_reward: pct / 100.0,
            projected_risk: Some(-0.5),
            risk_reward_ratio: Some(ratio),
            profit_pct: pct,
        };

        let ranked = rank(vec![mk(1.0, 5.0), mk(3.0, 1.0), mk(2.0, 9.0)], true);
        let ratios: Vec<f64> = ranked.iter().filter_map(|c| c.risk_reward_ratio).collect();
        assert_eq!(ratios, vec![3.0, 2.0, 1.0]);

        // Without a stop the profit percentage wins
        let ranked = rank(vec![mk(1.0, 5.0), mk(3.0, 1.0), mk(2.0, 9.0)], false);
        assert_eq!(ranked[0].profit_pct, 9.0);

        let many: Vec<_> = (0..30).map(|i| mk(i as f64, i as f64)).collect();
        assert_eq!(rank(many, true).len(), MAX_RESULTS);
    }
}
