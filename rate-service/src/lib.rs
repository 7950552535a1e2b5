pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod market;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod storage;
