//! The periodic price refresh sweep.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::holding::Holding;
use super::resolver::PriceResolver;
use crate::domain::error::StorageError;
use crate::ports::holding_store::HoldingStore;

/// Drives the recurring sweep: load every holding, resolve a fresh price
/// per holding with bounded concurrency, write the batch back.
///
/// Ticks never overlap: the timer loop awaits the running tick, and timer
/// deadlines that pass while a tick is still running are skipped rather
/// than queued. A storage failure aborts that tick only; the next tick is
/// a fresh independent attempt.
pub struct RefreshJob {
    store: Arc<dyn HoldingStore>,
    resolver: PriceResolver,
    period: Duration,
    concurrency: usize,
}

impl RefreshJob {
    pub fn new(
        store: Arc<dyn HoldingStore>,
        resolver: PriceResolver,
        period: Duration,
        concurrency: usize,
    ) -> Self {
        RefreshJob {
            store,
            resolver,
            period,
            concurrency,
        }
    }

    /// One full sweep over the holding set. Returns the number of holdings
    /// written back.
    pub async fn run_tick(&self) -> Result<usize, StorageError> {
        let holdings = self.store.load_all().await?;
        if holdings.is_empty() {
            return Ok(0);
        }

        let updated: Vec<Holding> = stream::iter(holdings)
            .map(|mut holding| async move {
                let resolved = self
                    .resolver
                    .resolve(&holding.symbol, holding.last_price)
                    .await;
                holding.last_price = resolved.price;
                holding
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        self.store.save_all(&updated).await?;
        Ok(updated.len())
    }

    /// Run the sweep on its fixed period until `shutdown` fires. An
    /// in-flight tick always runs to completion before the loop exits.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut timer = tokio::time::interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    match self.run_tick().await {
                        Ok(count) => info!(holdings = count, "sweep tick complete"),
                        Err(err) => warn!(cause = %err, "sweep tick aborted"),
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    }
}
