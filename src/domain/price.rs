//! Price rounding and resolved-price types.

/// Round to 2 decimal places, half-up. Prices in this system are always
/// non-negative, so half-away-from-zero and half-up coincide.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrigin {
    /// Fetched live from the quote API.
    Api,
    /// Derived locally from the last known price.
    Simulated,
}

/// The price chosen for a holding in one sweep tick, tagged with its
/// provenance. Transient: only `price` is written back to the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub price: f64,
    pub origin: PriceOrigin,
}
