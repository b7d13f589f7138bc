//! Black-Scholes pricer
//!
//! Provides:
//! - Theoretical European option price
//! - Greeks (delta, gamma, theta, vega)
//!
//! Implied volatility is consumed as an already-provided input; there is
//! no IV solver here. Degenerate inputs (non-positive T, sigma, spot or
//! strike) never reach the closed-form formula: the price falls back to
//! intrinsic value and the Greeks to zero. Pricing never panics.

use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::{Greeks, OptionKind};

/// Constant risk-free rate used across the backend.
pub const RISK_FREE_RATE: f64 = 0.05;

/// Minimum tradeable premium; the closed-form price is floored here.
const MIN_PREMIUM: f64 = 0.01;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
fn d1(s: f64, k: f64, rate: f64, sigma: f64, t: f64) -> f64 {
    ((s / k).ln() + (rate + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

fn degenerate(s: f64, k: f64, t: f64, sigma: f64) -> bool {
    t <= 0.0 || sigma <= 0.0 || s <= 0.0 || k <= 0.0
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Theoretical option price.
///
/// Degenerate inputs return exact intrinsic value; the closed-form result
/// is floored at 0.01. The asymmetry (unfloored fallback, floored
/// formula) matches the serving contract and must stay.
pub fn price(kind: OptionKind, s: f64, k: f64, t: f64, sigma: f64, rate: f64) -> f64 {
    if degenerate(s, k, t, sigma) {
        return kind.intrinsic(s, k);
    }

    let d1 = d1(s, k, rate, sigma, t);
    let d2 = d1 - sigma * t.sqrt();
    let df = (-rate * t).exp();

    let raw = match kind {
        OptionKind::Call => s * norm_cdf(d1) - k * df * norm_cdf(d2),
        OptionKind::Put => k * df * norm_cdf(-d2) - s * norm_cdf(-d1),
    };

    // Pathological inputs can overflow the formula; fall back rather
    // than serve a NaN.
    if !raw.is_finite() {
        return kind.intrinsic(s, k);
    }

    raw.max(MIN_PREMIUM)
}

/// Black-Scholes Greeks.
///
/// Degenerate inputs return all-zero Greeks (not intrinsic value).
/// Results are rounded to display precision: delta 3dp, gamma 4dp,
/// theta and vega 3dp. Theta is per calendar day, vega per 1-point IV
/// move.
pub fn greeks(kind: OptionKind, s: f64, k: f64, t: f64, sigma: f64) -> Greeks {
    if degenerate(s, k, t, sigma) {
        return Greeks::ZERO;
    }

    let rate = RISK_FREE_RATE;
    let d1 = d1(s, k, rate, sigma, t);
    let d2 = d1 - sigma * t.sqrt();
    let sqrt_t = t.sqrt();
    let df = (-rate * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let decay = -(s * pdf_d1 * sigma) / (2.0 * sqrt_t);
    let (delta, theta) = match kind {
        OptionKind::Call => (
            norm_cdf(d1),
            (decay - rate * k * df * norm_cdf(d2)) / 365.0,
        ),
        OptionKind::Put => (
            norm_cdf(d1) - 1.0,
            (decay + rate * k * df * norm_cdf(-d2)) / 365.0,
        ),
    };

    // Same for calls and puts
    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t / 100.0;

    if !(delta.is_finite() && gamma.is_finite() && theta.is_finite() && vega.is_finite()) {
        return Greeks::ZERO;
    }

    Greeks::new(
        round_to(delta, 3),
        round_to(gamma, 4),
        round_to(theta, 3),
        round_to(vega, 3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
    }

    #[test]
    fn test_put_call_parity() {
        // C - P = S - K*exp(-rT) for matching inputs
        let (s, k, t, sigma, r) = (100.0, 105.0, 0.5, 0.25, RISK_FREE_RATE);
        let call = price(OptionKind::Call, s, k, t, sigma, r);
        let put = price(OptionKind::Put, s, k, t, sigma, r);
        let parity = call - put - (s - k * (-r * t).exp());
        assert!(parity.abs() < 1e-6, "parity residual {parity}");
    }

    #[test]
    fn test_atm_short_dated_calls() {
        // 0DTE-ish ATM call: roughly 0.4 * S * sigma * sqrt(T)
        let p = price(OptionKind::Call, 100.0, 100.0, 1.0 / 365.0, 0.20, RISK_FREE_RATE);
        assert!(p > 0.35 && p < 0.50, "one-day price {p}");

        // One week out the premium crosses a dollar
        let p = price(OptionKind::Call, 100.0, 100.0, 7.0 / 365.0, 0.20, RISK_FREE_RATE);
        assert!(p > 1.10 && p < 1.30, "one-week price {p}");

        let g = greeks(OptionKind::Call, 100.0, 100.0, 1.0 / 365.0, 0.20);
        assert!(g.delta >= 0.50 && g.delta <= 0.55, "delta {}", g.delta);
        assert!(g.gamma > 0.0);
        assert!(g.theta < 0.0);
        assert!(g.vega > 0.0);
    }

    #[test]
    fn test_deep_otm_floors_at_min_premium() {
        // Worthless near-expiry call still quotes the minimum premium
        let p = price(OptionKind::Call, 100.0, 150.0, 0.01, 0.30, RISK_FREE_RATE);
        assert!((p - 0.01).abs() < 1e-12);

        let g = greeks(OptionKind::Call, 100.0, 150.0, 0.01, 0.30);
        assert!(g.delta.abs() < 0.001);
    }

    #[test]
    fn test_expiry_limit() {
        // T -> 0+ converges to intrinsic; T = 0 exactly returns intrinsic
        let near = price(OptionKind::Call, 110.0, 100.0, 0.0001, 0.20, RISK_FREE_RATE);
        assert!((near - 10.0).abs() < 0.05, "near-expiry price {near}");

        let at = price(OptionKind::Call, 110.0, 100.0, 0.0, 0.20, RISK_FREE_RATE);
        assert_eq!(at, 10.0);

        // OTM at expiry is exactly zero, not floored
        let otm = price(OptionKind::Call, 90.0, 100.0, 0.0, 0.20, RISK_FREE_RATE);
        assert_eq!(otm, 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        for (s, k, t, sigma) in [
            (100.0, 100.0, 0.0, 0.2),
            (100.0, 100.0, 0.1, 0.0),
            (0.0, 100.0, 0.1, 0.2),
            (100.0, 0.0, 0.1, 0.2),
            (100.0, 100.0, -1.0, 0.2),
        ] {
            assert_eq!(greeks(OptionKind::Call, s, k, t, sigma), Greeks::ZERO);
            assert_eq!(greeks(OptionKind::Put, s, k, t, sigma), Greeks::ZERO);
            let p = price(OptionKind::Put, s, k, t, sigma, RISK_FREE_RATE);
            assert_eq!(p, OptionKind::Put.intrinsic(s, k));
        }
    }

    #[test]
    fn test_delta_relation_and_shared_greeks() {
        let (s, k, t, sigma) = (420.0, 425.0, 7.0 / 365.0, 0.35);
        let call = greeks(OptionKind::Call, s, k, t, sigma);
        let put = greeks(OptionKind::Put, s, k, t, sigma);

        // delta(call) - delta(put) == 1 (rounding keeps this exact)
        assert!((call.delta - put.delta - 1.0).abs() < 1e-9);
        // gamma and vega are kind-independent
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
    }

    #[test]
    fn test_rounding_precision() {
        let g = greeks(OptionKind::Call, 100.0, 100.0, 30.0 / 365.0, 0.20);
        let scaled = g.delta * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "delta not 3dp");
        let scaled = g.gamma * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "gamma not 4dp");
    }
}
