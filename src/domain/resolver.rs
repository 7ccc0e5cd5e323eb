//! Price resolution policy: try the source, validate, else simulate.

use std::sync::Arc;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

use super::estimator::PriceEstimator;
use super::price::{PriceOrigin, ResolvedPrice, round2};
use super::symbol::Symbol;
use crate::ports::price_source::PriceSource;

/// Composes a [`PriceSource`] and a [`PriceEstimator`] into one policy.
///
/// `resolve` never fails: any source error, and equally any non-positive
/// quote, routes to the estimator. The two failure shapes are observably
/// equivalent here and share the fallback branch.
pub struct PriceResolver {
    source: Arc<dyn PriceSource>,
    estimator: PriceEstimator,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PriceSource>, estimator: PriceEstimator) -> Self {
        PriceResolver { source, estimator }
    }

    /// Resolve with a fresh entropy-seeded generator. Each call gets its
    /// own generator, so concurrent resolutions never contend on shared
    /// RNG state.
    pub async fn resolve(&self, symbol: &Symbol, last_price: f64) -> ResolvedPrice {
        let mut rng = SmallRng::from_entropy();
        self.resolve_with(symbol, last_price, &mut rng).await
    }

    /// Resolve with a caller-supplied randomness source.
    pub async fn resolve_with<R: Rng + Send>(
        &self,
        symbol: &Symbol,
        last_price: f64,
        rng: &mut R,
    ) -> ResolvedPrice {
        match self.source.quote(symbol).await {
            Ok(value) if value > 0.0 => {
                let price = round2(value);
                debug!(symbol = %symbol, price, "price from API");
                ResolvedPrice {
                    price,
                    origin: PriceOrigin::Api,
                }
            }
            Ok(value) => {
                warn!(symbol = %symbol, value, "non-positive quote, using simulation");
                self.simulate(last_price, rng)
            }
            Err(err) => {
                warn!(symbol = %symbol, cause = %err, "quote failed, using simulation");
                self.simulate(last_price, rng)
            }
        }
    }

    fn simulate<R: Rng>(&self, last_price: f64, rng: &mut R) -> ResolvedPrice {
        let price = self.estimator.estimate(Some(last_price), rng);
        ResolvedPrice {
            price,
            origin: PriceOrigin::Simulated,
        }
    }
}
