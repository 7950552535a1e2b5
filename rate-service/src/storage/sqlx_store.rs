use async_trait::async_trait;
use sqlx::AnyPool;

use crate::db::{Backend, Db};
use crate::market::types::Rate;
use crate::storage::{PersistenceError, RateStore};

const INSERT_RATE_POSTGRES: &str =
    "INSERT INTO rates (ask, bid, timestamp) VALUES ($1, $2, to_timestamp($3))";

const INSERT_RATE_SQLITE: &str =
    "INSERT INTO rates (ask, bid, timestamp) VALUES (?, ?, datetime(?, 'unixepoch'))";

/// SQLx-backed implementation of RateStore.
/// Concurrency comes from the pool; writes are not serialized here.
pub struct SqlxRateStore {
    pool: AnyPool,
    backend: Backend,
}

impl SqlxRateStore {
    pub fn new(db: &Db) -> Self {
        Self {
            pool: db.pool.clone(),
            backend: db.backend,
        }
    }

    fn insert_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => INSERT_RATE_POSTGRES,
            Backend::Sqlite => INSERT_RATE_SQLITE,
        }
    }
}

#[async_trait]
impl RateStore for SqlxRateStore {
    async fn save_rate(&self, rate: &Rate) -> Result<(), PersistenceError> {
        sqlx::query(self.insert_sql())
            .bind(rate.ask)
            .bind(rate.bid)
            .bind(rate.timestamp)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Waits for checked-out connections to be returned before closing them,
    /// so an in-flight `save_rate` completes.
    async fn close(&self) {
        self.pool.close().await;
    }
}
