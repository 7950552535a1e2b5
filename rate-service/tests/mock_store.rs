#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use rate_service::market::types::Rate;
use rate_service::storage::{PersistenceError, RateStore};

#[derive(Default)]
pub struct InMemoryRateStore {
    pub rates: Mutex<Vec<Rate>>,
    pub fail_with: Option<String>,
    pub closed: AtomicBool,
}

impl InMemoryRateStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub async fn saved(&self) -> Vec<Rate> {
        self.rates.lock().await.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn save_rate(&self, rate: &Rate) -> Result<(), PersistenceError> {
        if let Some(msg) = &self.fail_with {
            return Err(PersistenceError(sqlx::Error::Protocol(msg.clone())));
        }
        self.rates.lock().await.push(*rate);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
