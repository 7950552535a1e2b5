//! Wire types for `rate.RateService`.

use crate::market::types::Rate;

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Empty {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct RateResponse {
    #[prost(double, tag = "1")]
    pub ask: f64,
    #[prost(double, tag = "2")]
    pub bid: f64,
    #[prost(int64, tag = "3")]
    pub timestamp: i64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct HealthResponse {
    #[prost(bool, tag = "1")]
    pub status: bool,
}

impl From<Rate> for RateResponse {
    fn from(rate: Rate) -> Self {
        Self {
            ask: rate.ask,
            bid: rate.bid,
            timestamp: rate.timestamp,
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/rate.RateService.rs"));
