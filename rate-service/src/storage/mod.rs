pub mod sqlx_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::market::types::Rate;

pub use sqlx_store::SqlxRateStore;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct PersistenceError(#[from] pub sqlx::Error);

/// Durable sink for captured rates.
///
/// Implementations must accept concurrent `save_rate` calls.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Exactly one write per call. No batching or deduplication.
    async fn save_rate(&self, rate: &Rate) -> Result<(), PersistenceError>;

    /// Releases held connections. Called once at shutdown.
    async fn close(&self);
}
