#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use pricesweep::adapters::memory_adapter::MemoryStore;
use pricesweep::domain::error::{SourceError, StorageError};
use pricesweep::domain::holding::Holding;
use pricesweep::domain::symbol::Symbol;
use pricesweep::ports::holding_store::HoldingStore;
use pricesweep::ports::price_source::PriceSource;

/// Quote source scripted per symbol: fixed quotes, fixed errors, and a
/// default failure for anything unscripted.
pub struct ScriptedSource {
    quotes: HashMap<String, f64>,
    errors: HashMap<String, SourceError>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
            errors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_quote(mut self, symbol: &str, price: f64) -> Self {
        self.quotes.insert(symbol.to_string(), price);
        self
    }

    pub fn with_error(mut self, symbol: &str, error: SourceError) -> Self {
        self.errors.insert(symbol.to_string(), error);
        self
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn quote(&self, symbol: &Symbol) -> Result<f64, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.errors.get(symbol.as_str()) {
            return Err(err.clone());
        }
        self.quotes
            .get(symbol.as_str())
            .copied()
            .ok_or(SourceError::InvalidResponse {
                reason: "price field missing".into(),
            })
    }
}

/// A holding store whose next N `save_all` calls fail with Unavailable,
/// delegating to an in-memory store once the failures are exhausted.
pub struct FlakyStore {
    pub inner: Arc<MemoryStore>,
    failures_left: AtomicUsize,
    pub failed_saves: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_saves(inner: Arc<MemoryStore>, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
            failed_saves: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl HoldingStore for FlakyStore {
    async fn load_all(&self) -> Result<Vec<Holding>, StorageError> {
        self.inner.load_all().await
    }

    async fn save_all(&self, holdings: &[Holding]) -> Result<(), StorageError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            self.failed_saves.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::Unavailable {
                reason: "database offline".into(),
            });
        }
        self.inner.save_all(holdings).await
    }
}

pub fn make_holding(id: i64, symbol: &str, buy_price: f64, owner_id: i64) -> Holding {
    Holding::new(
        id,
        Symbol::new(symbol).unwrap(),
        10,
        buy_price,
        owner_id,
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    )
}
