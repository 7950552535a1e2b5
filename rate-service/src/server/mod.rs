pub mod proto;
pub mod rate_server;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

pub use rate_server::{GET_RATES, HEALTH_CHECK, RateServer, SAVE_RATE};

/// Serves the rate service on `listener`.
///
/// Once `shutdown` is cancelled the listener stops accepting and the future
/// resolves after in-flight calls have finished.
pub async fn serve(
    listener: TcpListener,
    server: RateServer,
    shutdown: CancellationToken,
) -> Result<(), tonic::transport::Error> {
    Server::builder()
        .add_service(server.into_service())
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            shutdown.cancelled_owned(),
        )
        .await
}
