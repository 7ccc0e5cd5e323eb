//! Quote source port trait.

use async_trait::async_trait;

use crate::domain::error::SourceError;
use crate::domain::symbol::Symbol;

/// A capability that returns a current market price for a symbol.
///
/// One invocation performs at most one outbound call; there is no retry
/// inside an implementation. A failed attempt is definitive for the tick
/// that issued it — the resolver falls back to simulation instead.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn quote(&self, symbol: &Symbol) -> Result<f64, SourceError>;
}
