//! Fallback price simulation.

use rand::Rng;

use super::price::round2;

/// Baseline used when no prior price exists to drift from.
pub const DEFAULT_BASELINE: f64 = 100.0;

/// Default symmetric drift bound (±1%).
pub const DEFAULT_DRIFT_BOUND: f64 = 0.01;

/// Produces a plausible fallback price from the last known value.
///
/// Pure with respect to its explicit inputs: the randomness source is a
/// parameter, never a shared generator. Production call sites seed a fresh
/// generator per resolution; tests pass a fixed-seed one.
#[derive(Debug, Clone, Copy)]
pub struct PriceEstimator {
    drift_bound: f64,
}

impl PriceEstimator {
    pub fn new(drift_bound: f64) -> Self {
        PriceEstimator { drift_bound }
    }

    /// Drift `previous` by a uniform factor in `[-bound, bound)`, rounded
    /// half-up to 2 decimals. An absent or non-positive `previous` falls
    /// back to [`DEFAULT_BASELINE`] as the basis. The result is clamped to
    /// one cent so a sub-cent basis can never round down to zero.
    pub fn estimate<R: Rng>(&self, previous: Option<f64>, rng: &mut R) -> f64 {
        let basis = match previous {
            Some(p) if p > 0.0 => p,
            _ => DEFAULT_BASELINE,
        };
        let drift = rng.gen_range(-self.drift_bound..self.drift_bound);
        round2(basis * (1.0 + drift)).max(0.01)
    }
}

impl Default for PriceEstimator {
    fn default() -> Self {
        PriceEstimator::new(DEFAULT_DRIFT_BOUND)
    }
}
