//! Chain enrichment
//!
//! Turns raw chain rows into the per-contract records the API serves:
//! Greeks, liquidity ratios, scalp score and a reversal estimate. Rows
//! are independent; a pathological row degrades to zero metrics instead
//! of aborting the batch.

use chrono::{NaiveDate, NaiveDateTime};

use super::black_scholes::greeks;
use super::projector::project;
use super::scalp::scalp_score;
use super::time::{calendar_years, TradingCalendar};
use crate::core::{EnrichedOption, Greeks, OptionKind, OptionRow};

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Enrich every row of a chain for one expiry.
///
/// `spot`, `day_high` and `day_low` come from the underlying's quote;
/// the trading-hours calendar drives the reversal estimate's time input.
pub fn enrich_chain(
    rows: &[OptionRow],
    spot: f64,
    day_high: f64,
    day_low: f64,
    expiry: NaiveDate,
    calendar: &TradingCalendar,
    now: NaiveDateTime,
) -> Vec<EnrichedOption> {
    rows.iter()
        .map(|row| enrich_row(row, spot, day_high, day_low, expiry, calendar, now))
        .collect()
}

fn enrich_row(
    row: &OptionRow,
    spot: f64,
    day_high: f64,
    day_low: f64,
    expiry: NaiveDate,
    calendar: &TradingCalendar,
    now: NaiveDateTime,
) -> EnrichedOption {
    let tte = calendar_years(expiry, now.date());

    // A missing spot still yields usable Greeks near the money
    let pricing_spot = if spot > 0.0 { spot } else { row.strike };
    let g = greeks(row.kind, pricing_spot, row.strike, tte, row.implied_volatility);

    let vol_oi_ratio = if row.open_interest > 0 {
        round2(row.volume as f64 / row.open_interest as f64)
    } else {
        0.0
    };

    let spread = round2(row.spread());
    let mid = row.mid_price();
    let spread_pct = if mid > 0.0 {
        round1(spread / mid * 100.0)
    } else {
        0.0
    };

    let score = scalp_score(g.gamma, vol_oi_ratio, spread_pct, g.delta);

    let (reversal_profit, reversal_pct) =
        reversal_estimate(row, &g, spot, day_high, day_low, expiry, calendar, now);

    let mut enriched = EnrichedOption {
        kind: row.kind,
        strike: row.strike,
        last_price: row.last_price,
        bid: row.bid,
        ask: row.ask,
        spread,
        spread_pct,
        volume: row.volume,
        open_interest: row.open_interest,
        implied_volatility: round2(row.implied_volatility * 100.0),
        in_the_money: row.in_the_money,
        contract_symbol: row.contract_symbol.clone(),
        greeks: g,
        vol_oi_ratio,
        scalp_score: score,
        reversal_profit,
        reversal_pct,
    };

    if !is_finite(&enriched) {
        enriched.greeks = Greeks::ZERO;
        enriched.vol_oi_ratio = 0.0;
        enriched.scalp_score = 0.0;
        enriched.reversal_profit = 0.0;
        enriched.reversal_pct = 0.0;
    }

    enriched
}

/// Projected per-contract profit if the stock reverts from its current
/// price back to the session high (calls) or low (puts), valued with the
/// session's remaining trading time.
#[allow(clippy::too_many_arguments)]
fn reversal_estimate(
    row: &OptionRow,
    g: &Greeks,
    spot: f64,
    day_high: f64,
    day_low: f64,
    expiry: NaiveDate,
    calendar: &TradingCalendar,
    now: NaiveDateTime,
) -> (f64, f64) {
    if spot <= 0.0 || row.implied_volatility <= 0.0 || g.delta == 0.0 {
        return (0.0, 0.0);
    }

    let target = match row.kind {
        OptionKind::Call if spot < day_high => day_high,
        OptionKind::Put if day_low > 0.0 && spot > day_low => day_low,
        _ => return (0.0, 0.0),
    };

    let entry = row.entry_cost();
    if entry <= 0.0 {
        return (0.0, 0.0);
    }

    let t_remaining = calendar.trading_years_until(now, expiry);
    let proj = project(
        row.kind,
        entry,
        row.strike,
        row.implied_volatility,
        target,
        None,
        t_remaining,
    );

    // Per contract (100 shares)
    (round2(proj.profit * 100.0), round1(proj.profit_pct))
}

fn is_finite(e: &EnrichedOption) -> bool {
    [
        e.greeks.delta,
        e.greeks.gamma,
        e.greeks.theta,
        e.greeks.vega,
        e.vol_oi_ratio,
        e.spread,
        e.spread_pct,
        e.scalp_score,
        e.reversal_profit,
        e.reversal_pct,
    ]
    .iter()
    .all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(kind: OptionKind, strike: f64, iv: f64) -> OptionRow {
        OptionRow {
            kind,
            strike,
            last_price: 1.20,
            bid: 1.15,
            ask: 1.25,
            volume: 500,
            open_interest: 1000,
            implied_volatility: iv,
            in_the_money: false,
            contract_symbol: format!("TEST{}{strike}", kind.as_str()),
        }
    }

    fn session_now() -> NaiveDateTime {
        // Wednesday, one hour into the session
        NaiveDate::from_ymd_opt(2025, 6, 4)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_zero_iv_row_degrades_not_excluded() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let rows = vec![row(OptionKind::Call, 100.0, 0.0)];
        let out = enrich_chain(&rows, 100.0, 101.0, 99.0, expiry, &TradingCalendar::default(), session_now());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].greeks, Greeks::ZERO);
        // Score still computed from zero gamma / zero delta
        let expected = scalp_score(0.0, out[0].vol_oi_ratio, out[0].spread_pct, 0.0);
        assert_eq!(out[0].scalp_score, expected);
        assert_eq!(out[0].reversal_profit, 0.0);
    }

    #[test]
    fn test_enriched_fields() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let rows = vec![row(OptionKind::Call, 100.0, 0.35)];
        let out = enrich_chain(&rows, 100.0, 102.0, 99.0, expiry, &TradingCalendar::default(), session_now());

        let e = &out[0];
        assert!((e.spread - 0.10).abs() < 1e-9);
        assert!((e.vol_oi_ratio - 0.50).abs() < 1e-9);
        // spread 0.10 on mid 1.20 = 8.3%
        assert!((e.spread_pct - 8.3).abs() < 1e-9);
        assert!((e.implied_volatility - 35.0).abs() < 1e-9);
        assert!(e.greeks.delta > 0.4 && e.greeks.delta < 0.6);
        assert!(e.scalp_score > 0.0);
    }

    #[test]
    fn test_reversal_favors_recovery_to_high() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let calls = vec![row(OptionKind::Call, 100.0, 0.35)];
        // Stock well below the session high: a reversion is a real move
        let out = enrich_chain(&calls, 100.0, 103.0, 99.0, expiry, &TradingCalendar::default(), session_now());
        assert!(out[0].reversal_profit > 0.0, "reversal {}", out[0].reversal_profit);

        // Already at the high: nothing to revert to
        let out = enrich_chain(&calls, 103.0, 103.0, 99.0, expiry, &TradingCalendar::default(), session_now());
        assert_eq!(out[0].reversal_profit, 0.0);
    }

    #[test]
    fn test_put_reversal_targets_day_low() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let puts = vec![row(OptionKind::Put, 100.0, 0.35)];
        let out = enrich_chain(&puts, 100.0, 102.0, 96.0, expiry, &TradingCalendar::default(), session_now());
        assert!(out[0].reversal_profit > 0.0);
    }

    #[test]
    fn test_missing_spot_falls_back_to_strike() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        let rows = vec![row(OptionKind::Call, 100.0, 0.30)];
        let out = enrich_chain(&rows, 0.0, 0.0, 0.0, expiry, &TradingCalendar::default(), session_now());
        // ATM against its own strike: delta near 0.5, no reversal
        assert!(out[0].greeks.delta > 0.4);
        assert_eq!(out[0].reversal_profit, 0.0);
    }
}
