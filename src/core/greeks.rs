//! Option Greeks
//!
//! First-order sensitivities as served to the dashboard. All values are
//! already rounded to their display precision by the pricer.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS, in [-1, 1]
    pub delta: f64,
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Theta: time decay per calendar day (typically negative)
    pub theta: f64,
    /// Vega: sensitivity per 1-percentage-point IV move
    pub vega: f64,
}

impl Greeks {
    /// All-zero Greeks, the degenerate-input fallback.
    pub const ZERO: Self = Self {
        delta: 0.0,
        gamma: 0.0,
        theta: 0.0,
        vega: 0.0,
    };

    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
        }
    }

    /// True when every component is zero (degenerate pricing output).
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
