use async_trait::async_trait;

use crate::market::grinex::errors::FetchError;
use crate::market::types::OrderBookSnapshot;

/// Source of order-book depth for the quoted market.
///
/// Implementations run inside the caller's span and are cancelled by dropping
/// the returned future.
#[async_trait]
pub trait DepthSource: Send + Sync {
    async fn fetch_depth(&self) -> Result<OrderBookSnapshot, FetchError>;
}
