//! In-memory holding store adapter.
//!
//! Backs tests and ad-hoc runs that do not want a database on disk. Write
//! semantics match the SQLite adapter: `save_all` updates by id inside one
//! lock acquisition and skips ids that no longer exist.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::error::StorageError;
use crate::domain::holding::Holding;
use crate::ports::holding_store::HoldingStore;

#[derive(Default)]
pub struct MemoryStore {
    holdings: Mutex<BTreeMap<i64, Holding>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, holding: Holding) {
        self.holdings.lock().unwrap().insert(holding.id, holding);
    }

    pub fn remove(&self, id: i64) -> Option<Holding> {
        self.holdings.lock().unwrap().remove(&id)
    }

    pub fn get(&self, id: i64) -> Option<Holding> {
        self.holdings.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.holdings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HoldingStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Holding>, StorageError> {
        Ok(self.holdings.lock().unwrap().values().cloned().collect())
    }

    async fn save_all(&self, holdings: &[Holding]) -> Result<(), StorageError> {
        let mut map = self.holdings.lock().unwrap();
        for holding in holdings {
            if map.contains_key(&holding.id) {
                map.insert(holding.id, holding.clone());
            }
        }
        Ok(())
    }
}
