use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{Span, debug, field, instrument};

use crate::market::grinex::api::DepthSource;
use crate::market::grinex::errors::FetchError;
use crate::market::types::OrderBookSnapshot;

pub const DEFAULT_DEPTH_URL: &str = "https://grinex.io/api/v2/depth?market=usdtrub";

/// HTTP client for the Grinex depth endpoint.
#[derive(Clone)]
pub struct GrinexClient {
    http: Client,
    url: String,
}

impl GrinexClient {
    /// `timeout` bounds the whole request, independent of any caller deadline.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DepthSource for GrinexClient {
    #[instrument(
        name = "FetchGrinexDepth",
        skip(self),
        fields(
            url = field::Empty,
            http.status = field::Empty,
            ask_count = field::Empty,
            bid_count = field::Empty
        )
    )]
    async fn fetch_depth(&self) -> Result<OrderBookSnapshot, FetchError> {
        Span::current().record("url", self.url.as_str());

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = resp.status();
        Span::current().record("http.status", status.as_u16());

        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(FetchError::Transport)?;
        let depth: OrderBookSnapshot = serde_json::from_slice(&body)?;

        let span = Span::current();
        span.record("ask_count", depth.asks.len());
        span.record("bid_count", depth.bids.len());

        debug!(
            asks = depth.asks.len(),
            bids = depth.bids.len(),
            "grinex depth fetched"
        );

        Ok(depth)
    }
}
