//! Scalp score heuristic
//!
//! A single comparable "quality for a quick trade" number per contract.
//! This is a heuristic ranking signal, not a statistically validated
//! model and not a probability: scores are comparable only within the
//! same computation.

/// Score a contract for short-holding-period suitability.
///
/// Rewards high gamma (responsiveness), unusual volume relative to open
/// interest (activity signal) and deltas near 0.5 (at the money), and
/// penalises wide spreads (execution cost). `spread_pct` is the bid-ask
/// spread as a percentage of the mid price. Result is floored at zero
/// and rounded to one decimal; typical range 0-90.
pub fn scalp_score(gamma: f64, vol_oi_ratio: f64, spread_pct: f64, delta: f64) -> f64 {
    let gamma_score = (gamma * 1000.0).min(50.0);
    let vol_oi_score = (vol_oi_ratio * 5.0).min(25.0);
    let spread_penalty = (spread_pct * 10.0).min(25.0);
    let atm_bonus = (1.0 - (delta.abs() - 0.5).abs() * 2.0) * 15.0;

    let score = gamma_score + vol_oi_score - spread_penalty + atm_bonus;
    (score.max(0.0) * 10.0).round() / 10.0
}
