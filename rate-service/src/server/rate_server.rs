use std::sync::Arc;

use common::logger::{TraceId, root_span};
use tonic::{Request, Response, Status};
use tracing::{Instrument, Span, error, field, info};

use crate::clock::{Clock, SystemClock};
use crate::error::RateServiceError;
use crate::market::grinex::DepthSource;
use crate::market::rate::extract_rate;
use crate::metrics::Metrics;
use crate::server::proto::rate_service_server::{RateService, RateServiceServer};
use crate::server::proto::{Empty, HealthResponse, RateResponse};
use crate::storage::RateStore;

pub const GET_RATES: &str = "GetRates";
pub const HEALTH_CHECK: &str = "HealthCheck";
/// Error label for persistence failures, distinct from the calling RPC.
pub const SAVE_RATE: &str = "SaveRate";

/// gRPC handler for `rate.RateService`.
///
/// Holds no mutable state of its own; the store, depth source and metrics are
/// shared handles that are already safe for concurrent calls.
#[derive(Clone)]
pub struct RateServer {
    store: Arc<dyn RateStore>,
    source: Arc<dyn DepthSource>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
    service_name: String,
}

impl RateServer {
    pub fn new(
        store: Arc<dyn RateStore>,
        source: Arc<dyn DepthSource>,
        metrics: Metrics,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            source,
            clock: Arc::new(SystemClock),
            metrics,
            service_name: service_name.into(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wraps the handler for registration on a tonic router.
    pub fn into_service(self) -> RateServiceServer<Self> {
        RateServiceServer::new(self)
    }

    /// Fetch → validate → parse → persist, inside a `GetRates` span.
    ///
    /// Dropping the returned future abandons whichever stage is in flight and
    /// skips the rest.
    pub async fn fetch_and_store_rate(&self) -> Result<RateResponse, RateServiceError> {
        let span = root_span(GET_RATES, &self.service_name, &TraceId::new());
        self.get_rates_inner().instrument(span).await
    }

    pub fn health(&self) -> HealthResponse {
        self.metrics.inc_requests(HEALTH_CHECK);
        HealthResponse { status: true }
    }

    async fn get_rates_inner(&self) -> Result<RateResponse, RateServiceError> {
        let _timer = self.metrics.start_timer(GET_RATES);
        self.metrics.inc_requests(GET_RATES);

        info!("fetching rate from grinex");

        let depth = self
            .source
            .fetch_depth()
            .await
            .map_err(|e| self.fail(GET_RATES, RateServiceError::Fetch(e)))?;

        let rate = extract_rate(&depth, self.clock.as_ref())
            .map_err(|e| self.fail(GET_RATES, e.into()))?;

        self.store
            .save_rate(&rate)
            .await
            .map_err(|e| self.fail(SAVE_RATE, RateServiceError::Save(e)))?;

        info!(
            ask = rate.ask,
            bid = rate.bid,
            timestamp = rate.timestamp,
            "successfully fetched and stored rate"
        );

        Ok(rate.into())
    }

    fn fail(&self, method: &'static str, err: RateServiceError) -> RateServiceError {
        self.metrics.inc_errors(method);
        Span::current().record("error", field::display(&err));
        error!(stage = err.stage(), error = %err, "get rates failed");
        err
    }
}

#[tonic::async_trait]
impl RateService for RateServer {
    async fn get_rates(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<RateResponse>, Status> {
        self.fetch_and_store_rate()
            .await
            .map(Response::new)
            .map_err(Status::from)
    }

    async fn health_check(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<HealthResponse>, Status> {
        Ok(Response::new(self.health()))
    }
}
