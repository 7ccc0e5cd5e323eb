//! SQLite holding store adapter.
//!
//! Blocking `rusqlite` calls behind an `r2d2` pool, bridged onto the async
//! port with `spawn_blocking`. The sweep's `save_all` runs as one
//! transaction of per-id UPDATEs: the batch is atomic, and a holding
//! deleted concurrently by its owner is a no-op rather than a
//! resurrection.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::domain::error::{PricesweepError, StorageError};
use crate::domain::holding::Holding;
use crate::domain::symbol::Symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::holding_store::HoldingStore;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteHoldingStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteHoldingStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PricesweepError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| PricesweepError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;
        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;
        Self::from_path(&db_path, pool_size)
    }

    pub fn from_path(path: &str, pool_size: u32) -> Result<Self, PricesweepError> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| StorageError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, PricesweepError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| StorageError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), PricesweepError> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS holdings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                buy_price REAL NOT NULL,
                last_price REAL NOT NULL,
                owner_id INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_holdings_owner ON holdings(owner_id);",
        )
        .map_err(|e: rusqlite::Error| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Insert a new holding priced at its buy price. CRUD-side operation,
    /// not used by the sweep.
    pub fn insert_holding(
        &self,
        symbol: Symbol,
        quantity: i64,
        buy_price: f64,
        owner_id: i64,
    ) -> Result<Holding, PricesweepError> {
        let created_at = Utc::now().naive_utc();
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO holdings (symbol, quantity, buy_price, last_price, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                symbol.as_str(),
                quantity,
                buy_price,
                buy_price,
                owner_id,
                created_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )
        .map_err(|e: rusqlite::Error| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        let id = conn.last_insert_rowid();
        Ok(Holding::new(
            id, symbol, quantity, buy_price, owner_id, created_at,
        ))
    }

    /// Delete a holding. CRUD-side operation; the sweep never deletes.
    pub fn delete_holding(&self, id: i64) -> Result<bool, PricesweepError> {
        let conn = self.get_conn()?;
        let affected = conn
            .execute("DELETE FROM holdings WHERE id = ?1", params![id])
            .map_err(|e: rusqlite::Error| StorageError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(affected > 0)
    }

    /// Blocking snapshot of every holding, used by the CLI listing.
    pub fn list_holdings(&self) -> Result<Vec<Holding>, PricesweepError> {
        Ok(Self::load_all_blocking(&self.pool)?)
    }

    fn get_conn(
        &self,
    ) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool.get().map_err(|e: r2d2::Error| StorageError::Unavailable {
            reason: e.to_string(),
        })
    }

    fn load_all_blocking(
        pool: &Pool<SqliteConnectionManager>,
    ) -> Result<Vec<Holding>, StorageError> {
        let conn = pool.get().map_err(|e: r2d2::Error| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        let mut stmt = conn
            .prepare(
                "SELECT id, symbol, quantity, buy_price, last_price, owner_id, created_at
                 FROM holdings",
            )
            .map_err(unavailable)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(unavailable)?;

        let mut holdings = Vec::new();
        for row in rows {
            let (id, symbol, quantity, buy_price, last_price, owner_id, created_at) =
                row.map_err(unavailable)?;
            let symbol = Symbol::new(&symbol).map_err(|e| StorageError::Unavailable {
                reason: format!("corrupt symbol in row {id}: {e}"),
            })?;
            let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
                .map_err(|e| StorageError::Unavailable {
                    reason: format!("corrupt timestamp in row {id}: {e}"),
                })?;
            holdings.push(Holding {
                id,
                symbol,
                quantity,
                buy_price,
                last_price,
                owner_id,
                created_at,
            });
        }
        Ok(holdings)
    }

    fn save_all_blocking(
        pool: &Pool<SqliteConnectionManager>,
        holdings: &[Holding],
    ) -> Result<(), StorageError> {
        let mut conn = pool.get().map_err(|e: r2d2::Error| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        let tx = conn.transaction().map_err(unavailable)?;
        for holding in holdings {
            // The sweep only rewrites last_price; rows deleted since the
            // snapshot was taken match nothing and are skipped.
            tx.execute(
                "UPDATE holdings SET last_price = ?1 WHERE id = ?2",
                params![holding.last_price, holding.id],
            )
            .map_err(unavailable)?;
        }
        tx.commit().map_err(unavailable)
    }
}

fn unavailable(e: rusqlite::Error) -> StorageError {
    StorageError::Unavailable {
        reason: e.to_string(),
    }
}

#[async_trait]
impl HoldingStore for SqliteHoldingStore {
    async fn load_all(&self) -> Result<Vec<Holding>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || Self::load_all_blocking(&pool))
            .await
            .map_err(|e| StorageError::Unavailable {
                reason: e.to_string(),
            })?
    }

    async fn save_all(&self, holdings: &[Holding]) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        let batch = holdings.to_vec();
        tokio::task::spawn_blocking(move || Self::save_all_blocking(&pool, &batch))
            .await
            .map_err(|e| StorageError::Unavailable {
                reason: e.to_string(),
            })?
    }
}
