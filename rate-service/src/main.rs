use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use common::logger::{init_logger, init_tracer};
use opentelemetry_sdk::trace::TracerProvider;
use rate_service::{
    config::AppConfig,
    db::Db,
    market::grinex::GrinexClient,
    metrics::{self, Metrics},
    server::{self, RateServer},
    shutdown::{shutdown_signal, stop_stage, stop_tracer},
    storage::{RateStore, SqlxRateStore},
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

type GrpcTask = JoinHandle<Result<(), tonic::transport::Error>>;
type MetricsTask = JoinHandle<std::io::Result<()>>;

/// Binds the gRPC port and starts serving. Failing to bind is fatal.
async fn start_grpc_server(
    cfg: &AppConfig,
    server: RateServer,
    shutdown: CancellationToken,
) -> anyhow::Result<GrpcTask> {
    let listener = TcpListener::bind(cfg.grpc_addr())
        .await
        .with_context(|| format!("failed to listen on grpc port {}", cfg.grpc_port))?;

    info!(address = %listener.local_addr()?, "starting gRPC server");

    Ok(tokio::spawn(server::serve(listener, server, shutdown)))
}

async fn start_metrics_server(
    cfg: &AppConfig,
    metrics: Metrics,
    shutdown: CancellationToken,
) -> anyhow::Result<MetricsTask> {
    let listener = TcpListener::bind(cfg.metrics_addr())
        .await
        .with_context(|| format!("failed to listen on metrics port {}", cfg.metrics_port))?;

    info!(address = %listener.local_addr()?, "starting metrics server");

    Ok(tokio::spawn(metrics::http::serve(listener, metrics, shutdown)))
}

/// Stops components in order: gRPC (drains in-flight calls), metrics, tracer,
/// store. Every stage runs even if an earlier one failed; any failure fails
/// the whole.
async fn graceful_shutdown(
    cfg: &AppConfig,
    grpc_shutdown: CancellationToken,
    grpc: GrpcTask,
    metrics_shutdown: CancellationToken,
    metrics_srv: MetricsTask,
    tracer: TracerProvider,
    store: Arc<dyn RateStore>,
) -> anyhow::Result<()> {
    info!("initiating graceful shutdown");
    let mut failed = false;

    grpc_shutdown.cancel();
    if let Err(e) = stop_stage("grpc server", grpc, None).await {
        error!(error = ?e, "grpc server shutdown failed");
        failed = true;
    }

    metrics_shutdown.cancel();
    if let Err(e) = stop_stage("metrics server", metrics_srv, Some(cfg.shutdown_timeout())).await {
        error!(error = ?e, "metrics server shutdown failed");
        failed = true;
    }

    if let Err(e) = stop_tracer(tracer, cfg.shutdown_timeout()).await {
        error!(error = ?e, "tracer provider shutdown failed");
        failed = true;
    }

    store.close().await;
    info!("rate store closed");

    if failed {
        anyhow::bail!("graceful shutdown failed");
    }
    Ok(())
}

async fn run(cfg: AppConfig, tracer: TracerProvider) -> anyhow::Result<()> {
    info!(
        service = %cfg.service_name,
        depth_url = %cfg.depth_url,
        "starting rate service"
    );

    let db = match Db::connect(&cfg.database_url).await {
        Ok(db) => db,
        Err(e) => {
            // nothing else is running yet; still flush whatever spans exist
            let _ = stop_tracer(tracer, cfg.shutdown_timeout()).await;
            return Err(e.context("db connection failed"));
        }
    };
    let store: Arc<dyn RateStore> = Arc::new(SqlxRateStore::new(&db));

    let source = Arc::new(
        GrinexClient::new(cfg.depth_url.clone(), cfg.upstream_timeout())
            .context("failed to build grinex client")?,
    );

    let metrics = Metrics::new();
    let server = RateServer::new(store.clone(), source, metrics.clone(), cfg.service_name.clone());

    let grpc_shutdown = CancellationToken::new();
    let metrics_shutdown = CancellationToken::new();

    let mut grpc = start_grpc_server(&cfg, server, grpc_shutdown.clone()).await?;
    let mut metrics_srv = start_metrics_server(&cfg, metrics, metrics_shutdown.clone()).await?;

    tokio::select! {
        _ = shutdown_signal() => {}
        res = &mut grpc => {
            return Err(anyhow::anyhow!("grpc server exited unexpectedly: {res:?}"));
        }
        res = &mut metrics_srv => {
            return Err(anyhow::anyhow!("metrics server exited unexpectedly: {res:?}"));
        }
    }

    graceful_shutdown(
        &cfg,
        grpc_shutdown,
        grpc,
        metrics_shutdown,
        metrics_srv,
        tracer,
        store,
    )
    .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = AppConfig::load();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";

    let tracer = match init_tracer(&cfg.service_name, &cfg.otlp_endpoint) {
        Ok(tracer) => tracer,
        Err(e) => {
            init_logger(&cfg.service_name, is_production, None);
            error!(error = %e, endpoint = %cfg.otlp_endpoint, "failed to initialize tracer");
            return ExitCode::FAILURE;
        }
    };
    init_logger(&cfg.service_name, is_production, Some(&tracer));
    info!(endpoint = %cfg.otlp_endpoint, "exporting traces");

    match run(cfg, tracer).await {
        Ok(()) => {
            info!("all components stopped gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = ?e, "rate service failed");
            ExitCode::FAILURE
        }
    }
}
