//! Holding storage port trait.

use async_trait::async_trait;

use crate::domain::error::StorageError;
use crate::domain::holding::Holding;

/// Read-all / write-all contract over the holding collection.
///
/// `load_all` promises no ordering. `save_all` must be atomic: either every
/// holding in the batch becomes visible or none does. Writes address rows by
/// id, so a holding deleted concurrently by its owner is skipped rather than
/// resurrected; a concurrent owner price-edit resolves last-writer-wins.
#[async_trait]
pub trait HoldingStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Holding>, StorageError>;

    async fn save_all(&self, holdings: &[Holding]) -> Result<(), StorageError>;
}
