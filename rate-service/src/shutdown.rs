use std::time::Duration;

use anyhow::{Context, anyhow};
use opentelemetry_sdk::trace::TracerProvider;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

/// Waits for a component task to finish, optionally within `limit`.
///
/// A timeout, a panic inside the task or an error returned by it all become
/// an error naming `stage`.
pub async fn stop_stage<E>(
    stage: &'static str,
    handle: JoinHandle<Result<(), E>>,
    limit: Option<Duration>,
) -> anyhow::Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let joined = match limit {
        Some(limit) => tokio::time::timeout(limit, handle)
            .await
            .map_err(|_| anyhow!("{stage} shutdown timed out after {limit:?}"))?,
        None => handle.await,
    };

    joined
        .with_context(|| format!("{stage} task panicked"))?
        .with_context(|| format!("{stage} shutdown error"))?;

    info!(stage, "component stopped");
    Ok(())
}

/// Flushes queued spans to the collector and stops the exporter within `limit`.
///
/// `TracerProvider::shutdown` blocks, so it runs on the blocking pool.
pub async fn stop_tracer(provider: TracerProvider, limit: Duration) -> anyhow::Result<()> {
    let handle = tokio::task::spawn_blocking(move || provider.shutdown());
    stop_stage("tracer provider", handle, Some(limit)).await
}
